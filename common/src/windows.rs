use serde::Serialize;

/// One value under a Registry key of interest (Run keys, MountPoints2, UserAssist)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryValueRecord {
    pub key_path: String,
    pub value_name: String, // "(default)" if the value has no name
    pub value_data: String, // Binary data is base64 encoded
    pub value_type: String, // Ex: REG_SZ
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventLogRecord {
    pub event_id: u32,
    pub raw_xml: String,
}
