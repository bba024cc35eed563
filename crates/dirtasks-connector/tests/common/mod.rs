//! Common test utilities for dirtasks-connector integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use dirtasks_connector::async_trait;
use dirtasks_connector::prelude::*;
use tokio_util::sync::CancellationToken;

/// Factory for a scripted failure. `ConnectorError` is not `Clone`.
pub type FailWith = Box<dyn Fn() -> ConnectorError + Send>;

/// One recorded page request.
#[derive(Debug, Clone)]
pub struct RecordedPage {
    pub page_number: u32,
    pub page_size: i32,
    pub cookie: Vec<u8>,
    pub search_base: String,
    pub filter: String,
    pub attributes: Vec<String>,
}

/// Everything the fake directory observed.
#[derive(Debug, Default)]
pub struct Recorder {
    pub connects: Vec<String>,
    pub binds: Vec<BindCredentials>,
    pub pages: Vec<RecordedPage>,
    pub adds: Vec<(String, String, Vec<String>)>,
    pub deletes: Vec<String>,
    pub closes: usize,
}

/// In-memory [`DirectoryClient`] serving scripted pages.
pub struct FakeDirectory {
    recorder: Arc<Mutex<Recorder>>,
    pages: VecDeque<PageResponse>,
    fail_connect: Option<FailWith>,
    fail_bind: Option<FailWith>,
    fail_page: Option<(u32, FailWith)>,
    fail_add: Option<FailWith>,
    fail_delete: Option<FailWith>,
    cancel_after_page: Option<(u32, CancellationToken)>,
    hang_on_page: Option<u32>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self {
            recorder: Arc::new(Mutex::new(Recorder::default())),
            pages: VecDeque::new(),
            fail_connect: None,
            fail_bind: None,
            fail_page: None,
            fail_add: None,
            fail_delete: None,
            cancel_after_page: None,
            hang_on_page: None,
        }
    }

    /// Handle on the recorder, kept by the test after the client is moved.
    pub fn recorder(&self) -> Arc<Mutex<Recorder>> {
        Arc::clone(&self.recorder)
    }

    pub fn with_page(mut self, page: PageResponse) -> Self {
        self.pages.push_back(page);
        self
    }

    /// Serve `entries` split into pages of `page_size`, with numbered
    /// cookies and an empty cookie on the last page.
    pub fn with_paged_entries(mut self, entries: Vec<RawEntry>, page_size: usize) -> Self {
        let chunks: Vec<Vec<RawEntry>> = entries.chunks(page_size).map(<[_]>::to_vec).collect();
        let count = chunks.len();
        for (idx, chunk) in chunks.into_iter().enumerate() {
            let cookie = if idx + 1 < count {
                format!("cookie-{}", idx + 1).into_bytes()
            } else {
                Vec::new()
            };
            self.pages.push_back(PageResponse {
                entries: chunk,
                cursor: Some(PageCursor::from_cookie(cookie)),
            });
        }
        self
    }

    pub fn failing_connect(mut self, fail: impl Fn() -> ConnectorError + Send + 'static) -> Self {
        self.fail_connect = Some(Box::new(fail));
        self
    }

    pub fn failing_bind(mut self, fail: impl Fn() -> ConnectorError + Send + 'static) -> Self {
        self.fail_bind = Some(Box::new(fail));
        self
    }

    pub fn failing_page(
        mut self,
        page_number: u32,
        fail: impl Fn() -> ConnectorError + Send + 'static,
    ) -> Self {
        self.fail_page = Some((page_number, Box::new(fail)));
        self
    }

    pub fn failing_add(mut self, fail: impl Fn() -> ConnectorError + Send + 'static) -> Self {
        self.fail_add = Some(Box::new(fail));
        self
    }

    pub fn failing_delete(mut self, fail: impl Fn() -> ConnectorError + Send + 'static) -> Self {
        self.fail_delete = Some(Box::new(fail));
        self
    }

    /// Cancel `token` right after page `page_number` has been served.
    pub fn cancelling_after_page(mut self, page_number: u32, token: CancellationToken) -> Self {
        self.cancel_after_page = Some((page_number, token));
        self
    }

    /// Never answer page `page_number`.
    pub fn hanging_on_page(mut self, page_number: u32) -> Self {
        self.hang_on_page = Some(page_number);
        self
    }
}

impl Default for FakeDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryClient for FakeDirectory {
    async fn connect(&mut self, config: &ConnectionConfig) -> ConnectorResult<()> {
        self.recorder.lock().unwrap().connects.push(config.url());
        match &self.fail_connect {
            Some(fail) => Err(fail()),
            None => Ok(()),
        }
    }

    async fn bind(&mut self, credentials: &BindCredentials) -> ConnectorResult<()> {
        self.recorder.lock().unwrap().binds.push(credentials.clone());
        match &self.fail_bind {
            Some(fail) => Err(fail()),
            None => Ok(()),
        }
    }

    async fn search_page(&mut self, request: &PageRequest<'_>) -> ConnectorResult<PageResponse> {
        self.recorder.lock().unwrap().pages.push(RecordedPage {
            page_number: request.page_number,
            page_size: request.page_size,
            cookie: request.cursor.cookie().to_vec(),
            search_base: request.spec.search_base.clone(),
            filter: request.spec.effective_filter().to_string(),
            attributes: request
                .spec
                .requested_attribute_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        });

        if self.hang_on_page == Some(request.page_number) {
            std::future::pending::<()>().await;
        }

        if let Some((page, fail)) = &self.fail_page {
            if *page == request.page_number {
                return Err(fail());
            }
        }

        let response = self.pages.pop_front().unwrap_or_default();

        if let Some((page, token)) = &self.cancel_after_page {
            if *page == request.page_number {
                token.cancel();
            }
        }

        Ok(response)
    }

    async fn add_values(
        &mut self,
        dn: &str,
        attribute: &str,
        values: &[String],
    ) -> ConnectorResult<()> {
        self.recorder.lock().unwrap().adds.push((
            dn.to_string(),
            attribute.to_string(),
            values.to_vec(),
        ));
        match &self.fail_add {
            Some(fail) => Err(fail()),
            None => Ok(()),
        }
    }

    async fn delete(&mut self, dn: &str) -> ConnectorResult<()> {
        self.recorder.lock().unwrap().deletes.push(dn.to_string());
        match &self.fail_delete {
            Some(fail) => Err(fail()),
            None => Ok(()),
        }
    }

    async fn close(&mut self) -> ConnectorResult<()> {
        self.recorder.lock().unwrap().closes += 1;
        Ok(())
    }
}

/// Authenticated config against a test host on the default port.
pub fn test_config() -> ConnectionConfig {
    ConnectionConfig::new("dc01.example.com").with_credentials("EXAMPLE\\svc-tasks", "s3cret")
}

/// A user entry with a `cn`, a multi-valued `memberOf` and a binary
/// `objectGUID` whose first byte is `index`.
pub fn user_entry(index: u8) -> RawEntry {
    let mut guid = vec![
        0x33, 0x22, 0x11, 0x00, 0x55, 0x44, 0x77, 0x66, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee,
        0xff,
    ];
    guid[0] = index;
    RawEntry {
        dn: format!("CN=User {},OU=Users,DC=example,DC=com", index),
        attributes: vec![
            RawAttribute::strings("cn", [format!("User {}", index)]),
            RawAttribute::strings(
                "memberOf",
                [
                    "CN=Staff,OU=Groups,DC=example,DC=com",
                    "CN=VPN,OU=Groups,DC=example,DC=com",
                ],
            ),
            RawAttribute::new("objectGUID", vec![guid]),
        ],
    }
}

/// `count` user entries numbered from 1.
pub fn user_entries(count: u8) -> Vec<RawEntry> {
    (1..=count).map(user_entry).collect()
}
