//! Usage snippets for downstream notebook runners
//!
//! Snippets are inert: the runner invocation sits inside a string literal so
//! executing the notebook does not launch anything.

use crate::params::ParameterTable;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::str::FromStr;

/// Declaration appended to the header when the nbrun loader is in use
pub const PARAMS_URI_DECLARATION: &str = "params_uri = \"\"";

const PARAMS_INDENT: &[u8] = b"        ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnippetKind {
    #[default]
    None,
    Papermill,
    NbRun,
}

impl FromStr for SnippetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(SnippetKind::None),
            "papermill" => Ok(SnippetKind::Papermill),
            "nbrun" => Ok(SnippetKind::NbRun),
            other => Err(format!(
                "Invalid snippet: {}. Valid options: none, papermill, nbrun",
                other
            )),
        }
    }
}

impl fmt::Display for SnippetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SnippetKind::None => "none",
            SnippetKind::Papermill => "papermill",
            SnippetKind::NbRun => "nbrun",
        };
        f.write_str(name)
    }
}

/// Everything the nbrun snippet and loader need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NbRunSettings {
    pub script_uri: String,
    pub utils_uri: String,
    pub instance_type: String,
    pub image: String,
}

/// Table entries as an ordered JSON object, optionally with an empty `params_uri`
struct SnippetParams<'a> {
    table: &'a ParameterTable,
    with_params_uri: bool,
}

impl Serialize for SnippetParams<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = usize::from(self.with_params_uri);
        let mut map = serializer.serialize_map(Some(self.table.len() + extra))?;
        for p in self.table {
            map.serialize_entry(&p.name, &p.value)?;
        }
        if self.with_params_uri {
            map.serialize_entry("params_uri", "")?;
        }
        map.end()
    }
}

fn params_json(table: &ParameterTable, with_params_uri: bool) -> Result<String, serde_json::Error> {
    let params = SnippetParams {
        table,
        with_params_uri,
    };
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(PARAMS_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    params.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn file_name(notebook: &str) -> &str {
    notebook.rsplit(['/', '\\']).next().unwrap_or(notebook)
}

pub fn papermill_snippet(
    notebook: &str,
    table: &ParameterTable,
    kernel_name: &str,
) -> Result<String, serde_json::Error> {
    let params = params_json(table, false)?;
    Ok(format!(
        r#"# PAPERMILL SNIPPET
"""
!pip install papermill --quiet
!mkdir notebook_output
import papermill as pm

p = pm.execute_notebook(
    "{notebook}",
    "notebook_output/o-{file_name}",
    parameters={params},
    kernel_name="{kernel_name}",
)
"""
"#,
        notebook = notebook,
        file_name = file_name(notebook),
        params = params,
        kernel_name = kernel_name,
    ))
}

pub fn nbrun_snippet(
    notebook: &str,
    table: &ParameterTable,
    settings: &NbRunSettings,
) -> Result<String, serde_json::Error> {
    let params = params_json(table, true)?;
    Ok(format!(
        r#"# NBRUN SNIPPET
"""
!rm -rf NBRun.py && aws s3 cp {script_uri} NBRun.py --quiet
!mkdir notebook_output
from NBRun import NBRun
import papermill as pm

n = NBRun(
    instance_type="{instance_type}",
    image="{image}",
    nb_uri="{notebook}",
    params={params},
    params_to_s3=True,
)
print(n.job_name)
n.status()
n.wait()
n.download_notebook(folder='notebook_output')
"""
"#,
        script_uri = settings.script_uri,
        instance_type = settings.instance_type,
        image = settings.image,
        notebook = notebook,
        params = params,
    ))
}

/// Cell that pulls overriding parameter values from `params_uri` at run time
pub fn params_uri_loader(utils_uri: &str) -> String {
    let module = file_name(utils_uri).trim_end_matches(".py");
    format!(
        r#"import json

if params_uri != '':
    !aws s3 cp {utils_uri} . --quiet
    from {module} import get_params_from_s3
    params = get_params_from_s3(params_uri)
    for key in params:
        print(key, params[key])
        globals()[key] = params[key]"#,
        utils_uri = utils_uri,
        module = module,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ParameterTable {
        let mut table = ParameterTable::new();
        table.resolve_or_create("bucket", "my-data");
        table.resolve_or_create("csv", "train.csv");
        table
    }

    fn settings() -> NbRunSettings {
        NbRunSettings {
            script_uri: "s3://tools/runner/NBRun.py".to_string(),
            utils_uri: "s3://tools/runner/utils.py".to_string(),
            instance_type: "ml.m5.large".to_string(),
            image: "runner-image".to_string(),
        }
    }

    #[test]
    fn test_snippet_kind_parse() {
        assert_eq!("papermill".parse::<SnippetKind>(), Ok(SnippetKind::Papermill));
        assert_eq!("NBRun".parse::<SnippetKind>(), Ok(SnippetKind::NbRun));
        assert_eq!("".parse::<SnippetKind>(), Ok(SnippetKind::None));
        assert!("other".parse::<SnippetKind>().is_err());
        assert_eq!(SnippetKind::NbRun.to_string(), "nbrun");
    }

    #[test]
    fn test_params_json_keeps_order_and_indent() {
        let json = params_json(&table(), false).unwrap();
        assert_eq!(
            json,
            "{\n        \"PARAM_BUCKET\": \"my-data\",\n        \"PARAM_CSV\": \"train.csv\"\n}"
        );
    }

    #[test]
    fn test_params_json_empty() {
        assert_eq!(params_json(&ParameterTable::new(), false).unwrap(), "{}");
    }

    #[test]
    fn test_params_json_with_params_uri() {
        let json = params_json(&table(), true).unwrap();
        assert!(json.ends_with("\"params_uri\": \"\"\n}"));
    }

    #[test]
    fn test_papermill_snippet() {
        let text = papermill_snippet("out/report.ipynb", &table(), "python3").unwrap();
        assert!(text.starts_with("# PAPERMILL SNIPPET\n\"\"\"\n"));
        assert!(text.contains("\"out/report.ipynb\","));
        assert!(text.contains("\"notebook_output/o-report.ipynb\","));
        assert!(text.contains("\"PARAM_BUCKET\": \"my-data\""));
        assert!(text.contains("kernel_name=\"python3\""));
    }

    #[test]
    fn test_nbrun_snippet() {
        let text = nbrun_snippet("report.ipynb", &table(), &settings()).unwrap();
        assert!(text.contains("aws s3 cp s3://tools/runner/NBRun.py NBRun.py --quiet"));
        assert!(text.contains("instance_type=\"ml.m5.large\""));
        assert!(text.contains("nb_uri=\"report.ipynb\""));
        assert!(text.contains("\"params_uri\": \"\""));
    }

    #[test]
    fn test_params_uri_loader() {
        let text = params_uri_loader("s3://tools/runner/utils.py");
        assert!(text.contains("!aws s3 cp s3://tools/runner/utils.py . --quiet"));
        assert!(text.contains("from utils import get_params_from_s3"));
    }
}
