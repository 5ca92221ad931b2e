use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
pub(crate) struct ActivityRow {
    pub(crate) id: String,
    pub(crate) date: String,
    pub(crate) reporter_id: String,
    pub(crate) reporter_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) nik: Option<String>,
    pub(crate) area_id: String,
    pub(crate) area_name: String,
    pub(crate) department_name: String,
    #[serde(
        default,
        alias = "keterangan",
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AreaRow {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) department_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) pic_id: Option<String>,
    #[serde(default = "yes", deserialize_with = "flag")]
    pub(crate) is_default: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserRow {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) nik: Option<String>,
    pub(crate) department_name: String,
    #[serde(default = "yes", deserialize_with = "flag")]
    pub(crate) is_default: bool,
}

fn yes() -> bool {
    true
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Spreadsheet exports write flags as `true`/`false`, `1`/`0` or `yes`/`no`.
/// A blank cell keeps the daily-reporting default.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a yes/no flag, found '{other}'"
        ))),
    }
}
