use serde::{Deserialize, Serialize};

/// One job listing as it appears on a search results page. Fields the page
/// does not carry come back empty rather than failing the whole listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub title: String,
    pub company: String,
    pub address: String,
    pub time_added: Option<String>,
    pub joburl: String,
    pub company_url: String,
    pub salary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Listings in document order, not deduplicated.
    pub jobs: Vec<Job>,
    /// The page's own result count, when it shows one.
    pub total: Option<u32>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_job_serializes_with_original_keys() {
        let job = Job {
            title: "Softwareentwickler".to_owned(),
            company: "Müller & Söhne".to_owned(),
            address: "München, Germany".to_owned(),
            time_added: Some("2024-03-01".to_owned()),
            joburl: "https://x.test/job/123".to_owned(),
            company_url: "https://x.test/company/mueller".to_owned(),
            salary: String::new(),
        };
        let json = serde_json::to_string_pretty(&job).unwrap();
        assert!(json.contains("\"timeAdded\": \"2024-03-01\""));
        assert!(json.contains("\"joburl\""));
        assert!(json.contains("\"companyUrl\""));
        // non-ASCII stays unescaped
        assert!(json.contains("Müller & Söhne"));
        // key order follows the struct declaration
        let title_at = json.find("\"title\"").unwrap();
        let company_at = json.find("\"company\"").unwrap();
        let salary_at = json.find("\"salary\"").unwrap();
        assert!(title_at < company_at && company_at < salary_at);
    }
}
