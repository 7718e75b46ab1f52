use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use tokio::sync::{Mutex, OnceCell};
use uuid::Uuid;

use super::rows::{text, SheetRow, SheetSnapshot};
use super::{Mirror, SyncError, Table};
use crate::config::GraphConfig;

/// Mirror backed by a workbook in the signed-in user's drive, reached
/// through the Graph REST API with a delegated bearer token.
pub struct GraphMirror {
    client: Client,
    base_url: String,
    token: String,
    workbook_name: String,
    workbook_id: OnceCell<String>,
    /// Held across every read-then-write so concurrent writers never patch
    /// the same row range.
    writes: Mutex<()>,
}

impl GraphMirror {
    pub fn new(config: &GraphConfig) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.access_token.clone(),
            workbook_name: config.workbook_name.clone(),
            workbook_id: OnceCell::new(),
            writes: Mutex::new(()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn workbook(&self) -> Result<&str, SyncError> {
        self.workbook_id
            .get()
            .map(String::as_str)
            .ok_or(SyncError::NotConnected)
    }

    fn sheet_path(&self, table: Table) -> Result<String, SyncError> {
        Ok(format!(
            "/me/drive/items/{}/workbook/worksheets/{}",
            self.workbook()?,
            table.sheet_name()
        ))
    }

    async fn send(&self, req: RequestBuilder) -> Result<Value, SyncError> {
        let resp = req.bearer_auth(&self.token).send().await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(SyncError::Api {
                status: status.as_u16(),
                message: body.chars().take(512).collect(),
            });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| SyncError::Malformed(e.to_string()))
    }

    async fn find_or_create_workbook(&self) -> Result<String, SyncError> {
        let found = self
            .send(
                self.client
                    .get(self.url("/me/drive/root/children"))
                    .query(&[("$filter", format!("name eq '{}'", self.workbook_name))]),
            )
            .await?;

        if let Some(id) = found["value"][0]["id"].as_str() {
            tracing::info!("Found workbook {} ({id})", self.workbook_name);
            return Ok(id.to_string());
        }

        let created = self
            .send(self.client.post(self.url("/me/drive/root/children")).json(&json!({
                "name": self.workbook_name,
                "file": {},
                "@microsoft.graph.conflictBehavior": "rename",
            })))
            .await?;

        let id = created["id"]
            .as_str()
            .ok_or_else(|| SyncError::Malformed("created workbook has no id".to_string()))?;
        tracing::info!("Created workbook {} ({id})", self.workbook_name);
        Ok(id.to_string())
    }

    async fn ensure_worksheets(&self) -> Result<(), SyncError> {
        let path = format!("/me/drive/items/{}/workbook/worksheets", self.workbook()?);
        let existing = self.send(self.client.get(self.url(&path))).await?;
        let names: Vec<&str> = existing["value"]
            .as_array()
            .map(|sheets| sheets.iter().filter_map(|s| s["name"].as_str()).collect())
            .unwrap_or_default();

        for table in Table::ALL {
            if names.contains(&table.sheet_name()) {
                continue;
            }

            self.send(
                self.client
                    .post(self.url(&path))
                    .json(&json!({ "name": table.sheet_name() })),
            )
            .await?;

            let header_cells: Vec<Value> = table.headers().iter().map(|h| json!(h)).collect();
            self.patch_range(table, 1, &[header_cells]).await?;
            tracing::debug!("Created worksheet {}", table.sheet_name());
        }
        Ok(())
    }

    async fn read_sheet(&self, table: Table) -> Result<Vec<SheetRow>, SyncError> {
        let path = format!("{}/usedRange", self.sheet_path(table)?);
        let used = self.send(self.client.get(self.url(&path))).await?;

        let Some(values) = used["values"].as_array() else {
            return Ok(Vec::new());
        };
        let Some((header_row, rows)) = values.split_first() else {
            return Ok(Vec::new());
        };

        let headers: Vec<String> = header_row
            .as_array()
            .map(|cells| cells.iter().map(cell_text).collect())
            .unwrap_or_default();

        Ok(rows
            .iter()
            .filter_map(Value::as_array)
            .filter(|cells| cells.iter().any(|c| !cell_text(c).is_empty()))
            .map(|cells| {
                headers
                    .iter()
                    .zip(cells)
                    .map(|(h, v)| (h.clone(), v.clone()))
                    .collect()
            })
            .collect())
    }

    /// Overwrite one row range starting at 1-based `first_row`.
    async fn patch_range(
        &self,
        table: Table,
        first_row: usize,
        values: &[Vec<Value>],
    ) -> Result<(), SyncError> {
        if values.is_empty() {
            return Ok(());
        }
        let address = format!(
            "A{first_row}:{}{}",
            column_name(table.headers().len()),
            first_row + values.len() - 1
        );
        let path = format!("{}/range(address='{address}')", self.sheet_path(table)?);
        self.send(self.client.patch(self.url(&path)).json(&json!({ "values": values })))
            .await?;
        Ok(())
    }

    async fn clear_rows(&self, table: Table, row_count: usize) -> Result<(), SyncError> {
        if row_count == 0 {
            return Ok(());
        }
        let address = format!("A2:{}{}", column_name(table.headers().len()), row_count + 1);
        let path = format!("{}/range(address='{address}')/clear", self.sheet_path(table)?);
        self.send(
            self.client
                .post(self.url(&path))
                .json(&json!({ "applyTo": "Contents" })),
        )
        .await?;
        Ok(())
    }

    /// Replace every data row of `table` with `rows`.
    async fn write_sheet(&self, table: Table, rows: &[SheetRow]) -> Result<(), SyncError> {
        let previous = self.read_sheet(table).await?.len();
        self.clear_rows(table, previous).await?;

        let values: Vec<Vec<Value>> = rows.iter().map(|r| ordered_cells(table, r)).collect();
        self.patch_range(table, 2, &values).await?;
        tracing::debug!("Wrote {} rows to {}", rows.len(), table.sheet_name());
        Ok(())
    }
}

#[async_trait]
impl Mirror for GraphMirror {
    fn name(&self) -> &str {
        "workbook"
    }

    async fn connect(&self) -> Result<(), SyncError> {
        self.workbook_id
            .get_or_try_init(|| self.find_or_create_workbook())
            .await?;
        self.ensure_worksheets().await
    }

    async fn push_record(&self, table: Table, record: SheetRow) -> Result<(), SyncError> {
        let _writing = self.writes.lock().await;
        let rows = self.read_sheet(table).await?;
        let record_id = text(&record, "ID");
        let row_number = rows
            .iter()
            .position(|r| text(r, "ID") == record_id)
            .unwrap_or(rows.len())
            + 2;

        self.patch_range(table, row_number, &[ordered_cells(table, &record)])
            .await
    }

    async fn remove_record(&self, table: Table, id: Uuid) -> Result<(), SyncError> {
        let id = id.to_string();
        let _writing = self.writes.lock().await;
        let rows: Vec<SheetRow> = self
            .read_sheet(table)
            .await?
            .into_iter()
            .filter(|r| text(r, "ID") != id)
            .collect();
        self.write_sheet(table, &rows).await
    }

    async fn push_all(&self, sheets: SheetSnapshot) -> Result<(), SyncError> {
        let _writing = self.writes.lock().await;
        try_join_all(
            Table::ALL
                .into_iter()
                .map(|table| self.write_sheet(table, sheets.rows(table))),
        )
        .await?;
        tracing::info!("Pushed all tables to workbook");
        Ok(())
    }

    async fn pull_all(&self) -> Result<SheetSnapshot, SyncError> {
        let (projects, resources, project_links, time_entries, project_managers) = tokio::try_join!(
            self.read_sheet(Table::Projects),
            self.read_sheet(Table::Resources),
            self.read_sheet(Table::ProjectLinks),
            self.read_sheet(Table::TimeEntries),
            self.read_sheet(Table::ProjectManagers),
        )?;

        Ok(SheetSnapshot {
            projects,
            resources,
            project_links,
            time_entries,
            project_managers,
        })
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn ordered_cells(table: Table, row: &SheetRow) -> Vec<Value> {
    table
        .headers()
        .iter()
        .map(|h| row.get(*h).cloned().unwrap_or_else(|| json!("")))
        .collect()
}

/// Spreadsheet column name for a 1-based column index (1 -> A, 27 -> AA).
pub fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    while index > 0 {
        let rem = (index - 1) % 26;
        name.push(b'A' + rem as u8);
        index = (index - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}
