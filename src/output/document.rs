use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

/// One cleaned page, ready to be written as an artifact
///
/// Built by the crawl pipeline after extraction and cleaning, consumed once by
/// the artifact writer and never changed in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub title: String,
    pub source_url: Url,
    pub target_name: String,
    pub crawled_at: DateTime<Utc>,
    /// Best-effort page metadata such as `Last Modified` or `Author`
    pub metadata: Vec<(String, String)>,
    pub body: String,
}

impl ExtractedDocument {
    /// Renders the artifact file content
    ///
    /// ```text
    /// Title: <title>
    /// URL: <source url>
    /// Source: <target name>
    /// Crawled: <RFC 3339 timestamp, UTC, milliseconds>
    /// <metadata key>: <value>      (zero or more)
    ///
    /// <body>
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 256);
        out.push_str(&format!("Title: {}\n", self.title));
        out.push_str(&format!("URL: {}\n", self.source_url));
        out.push_str(&format!("Source: {}\n", self.target_name));
        out.push_str(&format!(
            "Crawled: {}\n",
            self.crawled_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ));
        for (key, value) in &self.metadata {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        out.push('\n');
        out.push_str(&self.body);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn document(metadata: Vec<(String, String)>) -> ExtractedDocument {
        ExtractedDocument {
            title: "Quick Start".to_string(),
            source_url: Url::parse("https://react.dev/learn").unwrap(),
            target_name: "React Documentation".to_string(),
            crawled_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
            metadata,
            body: "Components are functions.".to_string(),
        }
    }

    #[test]
    fn test_render_without_metadata() {
        let rendered = document(Vec::new()).render();
        assert_eq!(
            rendered,
            "Title: Quick Start\n\
             URL: https://react.dev/learn\n\
             Source: React Documentation\n\
             Crawled: 2024-03-01T12:30:00.000Z\n\
             \n\
             Components are functions."
        );
    }

    #[test]
    fn test_render_with_metadata() {
        let rendered = document(vec![
            ("Last Modified".to_string(), "2024-02-28".to_string()),
            ("Author".to_string(), "Docs Team".to_string()),
        ])
        .render();

        assert!(rendered.contains(
            "Crawled: 2024-03-01T12:30:00.000Z\nLast Modified: 2024-02-28\nAuthor: Docs Team\n\nComponents"
        ));
        assert!(rendered.ends_with("Components are functions."));
    }
}
