use unicode_segmentation::UnicodeSegmentation;

const MAX_CHAR_LENGTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Trims surrounding whitespace before validating.
    pub fn parse(name: String) -> Result<ServiceName, String> {
        let name = name.trim();
        let is_too_long = name.graphemes(true).count() > MAX_CHAR_LENGTH;

        if name.is_empty() {
            return Err(String::from("empty service_name"));
        }

        if is_too_long {
            return Err(format!(
                "service_name is longer than {} characters",
                MAX_CHAR_LENGTH
            ));
        }

        Ok(Self(name.to_string()))
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
