use std::{env::VarError, path::Path, fs::read_to_string};

use anyhow::{Result, anyhow, bail, Context};
use serde_json::Value;

/// Get an env var as a String; decoding failures are reported as
/// errors.
pub fn getenv(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(s) => Ok(Some(s)),
        Err(e) => match e {
            VarError::NotPresent => Ok(None),
            VarError::NotUnicode(_) => bail!("{name:?} env var is not unicode"),
        }
    }
}

pub fn my_read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    read_to_string(&path).with_context(
        || anyhow!("opening path for reading: {:?}", path.as_ref()))
}

/// Parse `name=value` as given on the command line. The value is
/// taken as JSON if it parses as such (`n=3`, `flag=true`,
/// `xs=[1,2]`), as a plain string otherwise (`title=Hello`).
pub fn parse_assignment(s: &str) -> Result<(String, Value)> {
    let (name, val) = s.split_once('=').ok_or_else(
        || anyhow!("expecting name=value, got {s:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("missing name in {s:?}")
    }
    let value = serde_json::from_str(val)
        .unwrap_or_else(|_| Value::String(val.into()));
    Ok((name.into(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn t_parse_assignment() {
        assert_eq!(parse_assignment("title=Hello").unwrap(),
                   ("title".into(), json!("Hello")));
        assert_eq!(parse_assignment("n=3").unwrap(), ("n".into(), json!(3)));
        assert_eq!(parse_assignment("xs=[1,2]").unwrap(), ("xs".into(), json!([1, 2])));
        assert_eq!(parse_assignment("s=a=b").unwrap(), ("s".into(), json!("a=b")));
        assert_eq!(parse_assignment("empty=").unwrap(), ("empty".into(), json!("")));
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=3").is_err());
    }
}
