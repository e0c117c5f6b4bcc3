//! Test helpers: temporary workspaces, datasets and in-process CLI runs.

use super::*;
use camino::Utf8PathBuf;
use std::fs;
use tempfile::TempDir;

/// One route with a driver and three customers along a street, plus a
/// second route nobody has customers on.
pub(super) const DATASET: &str = r#"{
  "customers": [
    { "id": 1, "name": "Almacen Uno", "location": { "latitude": -34.6037, "longitude": -58.3786 } },
    { "id": 2, "name": "Kiosco Dos", "location": { "latitude": -34.6037, "longitude": -58.3806 } },
    { "id": 3, "name": "Bar Tres", "location": { "latitude": -34.6037, "longitude": -58.3796 } }
  ],
  "routes": [
    { "id": 1, "name": "centro", "origin": { "latitude": -34.6037, "longitude": -58.3816 }, "driver_id": 9 },
    { "id": 2, "name": "vacia", "origin": { "latitude": -34.6037, "longitude": -58.3816 }, "driver_id": 5 }
  ],
  "assignments": [
    { "route_id": 1, "customer_id": 1, "order": 1 },
    { "route_id": 1, "customer_id": 2, "order": 2 },
    { "route_id": 1, "customer_id": 3, "order": 3 }
  ],
  "scheduled_deliveries": [
    { "route_id": 1, "customer_id": 1, "date": "2024-03-01", "planned_regular_qty": 60, "planned_special_qty": 30, "product_name": "pan" },
    { "route_id": 1, "customer_id": 2, "date": "2024-03-01", "planned_regular_qty": 40, "planned_special_qty": 20, "product_name": "pan" }
  ]
}"#;

/// Deliveries against session 1: 80 regular and 60 special in total.
pub(super) const RECORDS: &str = r#"{
  "delivery_records": [
    { "session_id": 1, "customer_id": 1, "regular_qty_delivered": 50, "special_qty_delivered": 40 },
    { "session_id": 1, "customer_id": 2, "regular_qty_delivered": 30, "special_qty_delivered": 20 }
  ]
}"#;

#[derive(Debug)]
pub(super) struct Workspace {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }

    pub(super) fn db(&self) -> Utf8PathBuf {
        self.root.join("reparto.db")
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).expect("write workspace file");
        path
    }

    /// Run `args` with `--db` pointing into the workspace.
    pub(super) fn run(&self, args: &[&str]) -> Result<String, CliError> {
        let db = self.db();
        let mut argv: Vec<&str> = args.to_vec();
        argv.extend(["--db", db.as_str()]);
        run_cli(&argv)
    }

    pub(super) fn import(&self, name: &str, contents: &str) {
        let path = self.write(name, contents);
        self.run(&["import", path.as_str()])
            .expect("dataset should import");
    }
}

/// Parse and dispatch `args` in process, capturing stdout.
pub(super) fn run_cli(args: &[&str]) -> Result<String, CliError> {
    let cli = Cli::try_parse_from(std::iter::once("reparto").chain(args.iter().copied()))?;
    let mut stdout = Vec::new();
    dispatch(cli.command, &mut stdout)?;
    Ok(String::from_utf8(stdout).expect("utf-8 output"))
}

pub(super) fn parse_json(output: &str) -> serde_json::Value {
    serde_json::from_str(output).expect("command prints JSON")
}
