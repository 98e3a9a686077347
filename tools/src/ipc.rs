//! JSON-lines query service: one request per input line, one JSON
//! response per output line. Errors are answered, never fatal.

use anyhow::Result;
use climate_lab_core::{
    query::{ExperimentFilter, Query, SortKey, SortOrder},
    types::Priority,
    ExperimentCatalog, ExperimentGenerator, SnapshotFiles,
};
use std::io::{BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcRequest {
    ListExperiments {
        segment: Option<String>,
        region: Option<String>,
        event: Option<String>,
        channel: Option<String>,
        priority: Option<String>,
        sort: Option<String>,
        order: Option<String>,
    },
    GetSummary,
    GetExperiment {
        id: String,
    },
    GetFilters,
    Regenerate {
        count: Option<usize>,
        seed: Option<u64>,
    },
    Quit,
}

pub struct Session<'a> {
    catalog: &'a mut ExperimentCatalog,
    files: &'a SnapshotFiles,
    generator: &'a ExperimentGenerator,
    default_count: usize,
}

impl<'a> Session<'a> {
    pub fn new(
        catalog: &'a mut ExperimentCatalog,
        files: &'a SnapshotFiles,
        generator: &'a ExperimentGenerator,
        default_count: usize,
    ) -> Self {
        Self {
            catalog,
            files,
            generator,
            default_count,
        }
    }

    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> Result<()> {
        let mut buffer = String::new();

        loop {
            buffer.clear();
            let bytes_read = input.read_line(&mut buffer)?;
            if bytes_read == 0 {
                break; // EOF
            }
            if buffer.trim().is_empty() {
                continue;
            }

            let request: IpcRequest = match serde_json::from_str(&buffer) {
                Ok(r) => r,
                Err(e) => {
                    writeln!(output, "{}", error_json(e.to_string()))?;
                    output.flush()?;
                    continue;
                }
            };

            if let IpcRequest::Quit = request {
                break;
            }
            let response = self.handle(request);
            writeln!(output, "{response}")?;
            output.flush()?;
        }
        Ok(())
    }

    fn handle(&mut self, request: IpcRequest) -> serde_json::Value {
        let snapshot = self.catalog.snapshot();
        match request {
            IpcRequest::ListExperiments {
                segment,
                region,
                event,
                channel,
                priority,
                sort,
                order,
            } => {
                // An unknown priority can match nothing; that is an empty
                // result, not an error.
                let priority = match priority.as_deref() {
                    None | Some("") => None,
                    Some(p) => match p.parse::<Priority>() {
                        Ok(p) => Some(p),
                        Err(_) => return serde_json::json!([]),
                    },
                };
                let mut query = Query::new(ExperimentFilter {
                    user_segment: segment,
                    region,
                    climate_event: event,
                    alert_channel: channel,
                    priority,
                });
                if let Some(key) = sort.as_deref().and_then(SortKey::parse) {
                    let order = order.as_deref().map(SortOrder::parse).unwrap_or_default();
                    query = query.sorted_by(key, order);
                }
                to_json(&snapshot.query(&query))
            }
            IpcRequest::GetSummary => to_json(snapshot.summary()),
            IpcRequest::GetExperiment { id } => match snapshot.experiment(&id) {
                Some(exp) => to_json(exp),
                None => serde_json::json!({ "error": "Experiment not found", "id": id }),
            },
            IpcRequest::GetFilters => to_json(&snapshot.filter_options()),
            IpcRequest::Regenerate { count, seed } => self.regenerate(count, seed),
            IpcRequest::Quit => serde_json::Value::Null,
        }
    }

    fn regenerate(&mut self, count: Option<usize>, seed: Option<u64>) -> serde_json::Value {
        let count = count.unwrap_or(self.default_count);
        let reseeded;
        let generator = match seed {
            Some(seed) if seed != self.generator.seed() => {
                match ExperimentGenerator::new(self.generator.config().clone(), seed) {
                    Ok(g) => {
                        reseeded = g;
                        &reseeded
                    }
                    Err(e) => return error_json(e.to_string()),
                }
            }
            _ => self.generator,
        };
        match self.catalog.regenerate(self.files, generator, count) {
            Ok(snapshot) => serde_json::json!({
                "regenerated": snapshot.len(),
                "seed": generator.seed(),
            }),
            Err(e) => {
                log::warn!("regenerate failed: {e}");
                error_json(e.to_string())
            }
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|e| error_json(e.to_string()))
}

fn error_json(message: String) -> serde_json::Value {
    serde_json::json!({ "error": message })
}
