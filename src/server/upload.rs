use super::ApiError;
use crate::pipeline::SummaryRequest;
use axum::extract::Multipart;

const FILE_FIELD: &str = "file";

/// An uploaded document with its data and metadata.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parsed form fields from a multipart upload.
pub struct FormFields {
    pub file: UploadedFile,
    /// Summary options; `text` is left empty
    pub request: SummaryRequest,
}

/// Parse a multipart form upload.
///
/// The document is taken from the `file` field, or from the first field carrying a
/// filename. `topics` may be a JSON array or a comma-separated list.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<FormFields, ApiError> {
    let mut file: Option<UploadedFile> = None;
    let mut request = SummaryRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        let filename = field.file_name().map(str::to_string);

        match name.as_str() {
            "topics" => {
                let val = field.text().await?;
                let topics = parse_topics(&val);
                if !topics.is_empty() {
                    request.topics = Some(topics);
                }
            }
            "topic" => request.topic = Some(field.text().await?),
            "model" => request.model = Some(field.text().await?),
            _ if name == FILE_FIELD || (filename.is_some() && file.is_none()) => {
                let data = field.bytes().await?.to_vec();
                file = Some(UploadedFile {
                    filename: filename.unwrap_or_default(),
                    data,
                });
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await?;
            }
        }
    }

    let file = file.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    Ok(FormFields { file, request })
}

fn parse_topics(val: &str) -> Vec<String> {
    if let Ok(topics) = serde_json::from_str::<Vec<String>>(val) {
        return topics;
    }
    val.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_accept_json_or_commas() {
        assert_eq!(parse_topics(r#"["a, b", "c"]"#), vec!["a, b", "c"]);
        assert_eq!(parse_topics("risks, budget ,"), vec!["risks", "budget"]);
        assert!(parse_topics("  ").is_empty());
    }
}
