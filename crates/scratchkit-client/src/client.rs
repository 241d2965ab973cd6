use crate::error::ClientError;
use crate::soap;
use crate::Result;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use scratchkit_core::config::OrgCredentials;
use scratchkit_core::connection::{MetadataItem, MetadataRecord, OrgConnection, QueryRecord};
use scratchkit_core::ScratchError;
use serde::Deserialize;
use tracing::debug;

const SOAP_ACTION: &str = "SOAPAction";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct VersionEntry {
    version: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryPage {
    done: bool,
    #[serde(default)]
    next_records_url: Option<String>,
    #[serde(default)]
    records: Vec<QueryRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    error_code: Option<String>,
}

/// Render a REST error body (`[{"message", "errorCode"}]`) for humans,
/// falling back to the raw text.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<Vec<ApiErrorBody>>(body) {
        Ok(errors) if !errors.is_empty() => errors
            .into_iter()
            .map(|e| match e.error_code {
                Some(code) => format!("{code}: {}", e.message),
                None => e.message,
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.trim().to_string(),
    }
}

/// Parse `"60.0"` into a comparable `(60, 0)`.
fn parse_version(version: &str) -> Option<(u32, u32)> {
    let (major, minor) = version.split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

// ---------------------------------------------------------------------------
// OrgClient
// ---------------------------------------------------------------------------

/// Authenticated client for one org instance.
#[derive(Debug, Clone)]
pub struct OrgClient {
    http: reqwest::Client,
    instance_url: String,
    access_token: String,
    api_version: String,
}

impl OrgClient {
    /// Build a client; discovers the latest API version when the
    /// credentials do not pin one.
    pub async fn connect(credentials: &OrgCredentials) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("scratchkit/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let instance_url = credentials.instance_url.trim_end_matches('/').to_string();
        let api_version = match &credentials.api_version {
            Some(v) => v.clone(),
            None => latest_api_version(&http, &instance_url, &credentials.access_token).await?,
        };
        debug!(instance = %instance_url, api_version = %api_version, "org client ready");
        Ok(Self {
            http,
            instance_url,
            access_token: credentials.access_token.clone(),
            api_version,
        })
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Run `soql`, following `nextRecordsUrl` until the result is done.
    pub async fn query_all(&self, soql: &str) -> Result<Vec<QueryRecord>> {
        let first = format!(
            "{}/services/data/v{}/query",
            self.instance_url, self.api_version
        );
        debug!(soql, "query");
        let mut page: QueryPage = self
            .get_json(self.http.get(&first).query(&[("q", soql)]))
            .await?;
        let mut records = std::mem::take(&mut page.records);

        while !page.done {
            let Some(next) = page.next_records_url.take() else {
                break;
            };
            debug!(next = %next, "query next page");
            page = self
                .get_json(self.http.get(format!("{}{next}", self.instance_url)))
                .await?;
            records.append(&mut page.records);
        }
        Ok(records)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = request.header(AUTHORIZATION, self.bearer()).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// POST one metadata API call and return the raw response envelope.
    async fn soap_call(&self, operation: &str, body: String) -> Result<String> {
        let url = format!("{}/services/Soap/m/{}", self.instance_url, self.api_version);
        debug!(operation, "metadata call");
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "text/xml; charset=UTF-8")
            .header(SOAP_ACTION, "\"\"")
            .body(soap::envelope(&self.access_token, &body))
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            // Faults come back as HTTP 500 with a SOAP body.
            if let Err(fault @ ClientError::Fault { .. }) = soap::check_fault(&text) {
                return Err(fault);
            }
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: text.trim().to_string(),
            });
        }
        Ok(text)
    }

    pub async fn list(&self, metadata_type: &str) -> Result<Vec<MetadataItem>> {
        let xml = self
            .soap_call(
                "listMetadata",
                soap::list_metadata_body(metadata_type, &self.api_version),
            )
            .await?;
        soap::parse_list_metadata(&xml)
    }

    pub async fn read(&self, metadata_type: &str, full_name: &str) -> Result<Option<MetadataRecord>> {
        let xml = self
            .soap_call(
                "readMetadata",
                soap::read_metadata_body(metadata_type, full_name),
            )
            .await?;
        soap::parse_read_metadata(&xml, metadata_type)
    }

    pub async fn update(&self, record: &MetadataRecord) -> Result<()> {
        let xml = self
            .soap_call("updateMetadata", soap::update_metadata_body(record))
            .await?;
        soap::parse_save_result(&xml)
    }
}

/// Highest API version the instance advertises.
pub async fn latest_api_version(
    http: &reqwest::Client,
    instance_url: &str,
    access_token: &str,
) -> Result<String> {
    let response = http
        .get(format!("{instance_url}/services/data/"))
        .header(AUTHORIZATION, format!("Bearer {access_token}"))
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: api_error_message(&body),
        });
    }
    let versions: Vec<VersionEntry> = serde_json::from_str(&body)?;
    versions
        .into_iter()
        .filter_map(|v| parse_version(&v.version).map(|key| (key, v.version)))
        .max_by_key(|(key, _)| *key)
        .map(|(_, version)| version)
        .ok_or(ClientError::NoApiVersion)
}

// ---------------------------------------------------------------------------
// OrgConnection
// ---------------------------------------------------------------------------

impl OrgConnection for OrgClient {
    async fn query(&self, soql: &str) -> scratchkit_core::Result<Vec<QueryRecord>> {
        self.query_all(soql)
            .await
            .map_err(|e| ScratchError::remote("query", e))
    }

    async fn list_metadata(&self, metadata_type: &str) -> scratchkit_core::Result<Vec<MetadataItem>> {
        self.list(metadata_type)
            .await
            .map_err(|e| ScratchError::remote("listMetadata", e))
    }

    async fn read_metadata(
        &self,
        metadata_type: &str,
        full_name: &str,
    ) -> scratchkit_core::Result<Option<MetadataRecord>> {
        self.read(metadata_type, full_name)
            .await
            .map_err(|e| ScratchError::remote("readMetadata", e))
    }

    async fn update_metadata(&self, record: &MetadataRecord) -> scratchkit_core::Result<()> {
        self.update(record)
            .await
            .map_err(|e| ScratchError::remote("updateMetadata", e))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soap::fixtures;
    use mockito::Matcher;
    use serde_json::json;

    async fn client_for(server: &mockito::ServerGuard) -> OrgClient {
        let mut creds = OrgCredentials::new(server.url(), "00D!token");
        creds.api_version = Some("60.0".to_string());
        OrgClient::connect(&creds).await.unwrap()
    }

    #[test]
    fn error_messages_from_rest_bodies() {
        assert_eq!(
            api_error_message(r#"[{"message":"unexpected token: FROM","errorCode":"MALFORMED_QUERY"}]"#),
            "MALFORMED_QUERY: unexpected token: FROM"
        );
        assert_eq!(api_error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn versions_compare_numerically() {
        assert!(parse_version("60.0") > parse_version("9.0"));
        assert_eq!(parse_version("v60"), None);
    }

    #[tokio::test]
    async fn discovers_latest_api_version() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/services/data/")
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"label":"Winter '24","url":"/services/data/v59.0","version":"59.0"},
                    {"label":"Spring '24","url":"/services/data/v60.0","version":"60.0"},
                    {"label":"Old","url":"/services/data/v9.0","version":"9.0"}]"#,
            )
            .create_async()
            .await;

        let client = OrgClient::connect(&OrgCredentials::new(server.url(), "tok"))
            .await
            .unwrap();
        assert_eq!(client.api_version(), "60.0");
    }

    #[tokio::test]
    async fn query_follows_pagination() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/services/data/v60.0/query")
            .match_query(Matcher::UrlEncoded(
                "q".into(),
                "Select Id from Organization".into(),
            ))
            .match_header("authorization", "Bearer 00D!token")
            .with_body(
                json!({
                    "totalSize": 2,
                    "done": false,
                    "nextRecordsUrl": "/services/data/v60.0/query/01g-2000",
                    "records": [{"Id": "1"}]
                })
                .to_string(),
            )
            .create_async()
            .await;
        let second = server
            .mock("GET", "/services/data/v60.0/query/01g-2000")
            .with_body(json!({"totalSize": 2, "done": true, "records": [{"Id": "2"}]}).to_string())
            .create_async()
            .await;

        let client = client_for(&server).await;
        let records = client.query_all("Select Id from Organization").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["Id"], json!("2"));
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn query_error_surfaces_api_message() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/services/data/v60.0/query")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"[{"message":"sObject type 'ShapeRepresentation' is not supported.","errorCode":"INVALID_TYPE"}]"#)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let err = client.query("Select Edition from ShapeRepresentation").await.unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("query failed"), "{text}");
        assert!(text.contains("INVALID_TYPE"), "{text}");
    }

    #[tokio::test]
    async fn list_and_read_metadata() {
        let mut server = mockito::Server::new_async().await;
        let _list = server
            .mock("POST", "/services/Soap/m/60.0")
            .match_body(Matcher::Regex("<listMetadata>".into()))
            .match_header("soapaction", "\"\"")
            .with_body(fixtures::list_response(&[("Mobile", "Settings")]))
            .create_async()
            .await;
        let _read = server
            .mock("POST", "/services/Soap/m/60.0")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("<readMetadata>".into()),
                Matcher::Regex("<type>MobileSettings</type>".into()),
                Matcher::Regex("<sessionId>00D!token</sessionId>".into()),
            ]))
            .with_body(fixtures::read_response(
                "MobileSettings",
                "<fullName>Mobile</fullName><enableS1EncryptedStoragePref2>false</enableS1EncryptedStoragePref2>",
            ))
            .create_async()
            .await;

        let client = client_for(&server).await;
        let items = client.list_metadata("Settings").await.unwrap();
        assert_eq!(items, vec![MetadataItem::new("Mobile", "Settings")]);

        let record = client
            .read_metadata("MobileSettings", "Mobile")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.type_name, "MobileSettings");
        assert_eq!(record.fields["enableS1EncryptedStoragePref2"], json!("false"));
    }

    #[tokio::test]
    async fn soap_fault_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/services/Soap/m/60.0")
            .with_status(500)
            .with_body(fixtures::fault("sf:INVALID_SESSION_ID", "Invalid Session ID found in SessionHeader"))
            .create_async()
            .await;

        let client = client_for(&server).await;
        let err = client.read_metadata("AccountSettings", "Account").await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("readMetadata failed"), "{text}");
        assert!(text.contains("INVALID_SESSION_ID"), "{text}");
    }

    #[tokio::test]
    async fn update_sends_record_and_checks_result() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/services/Soap/m/60.0")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("<updateMetadata>".into()),
                Matcher::Regex("xsi:type=\"StandardValueSet\"".into()),
                Matcher::Regex("<label>Signed</label>".into()),
            ]))
            .with_body(fixtures::response(
                "<updateMetadataResponse><result><fullName>ContractStatus</fullName><success>true</success></result></updateMetadataResponse>",
            ))
            .create_async()
            .await;

        let serde_json::Value::Object(fields) = json!({
            "fullName": "ContractStatus",
            "standardValue": [{"fullName": "Signed", "default": "false", "label": "Signed"}]
        }) else {
            unreachable!()
        };
        let client = client_for(&server).await;
        client
            .update_metadata(&MetadataRecord::new("StandardValueSet", fields))
            .await
            .unwrap();
        m.assert_async().await;
    }
}
