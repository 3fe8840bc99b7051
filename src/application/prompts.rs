//! Prompt templates for the three generation stages of the scan pipeline.

use serde_json::Value;

fn pretty(scan_data: &Value) -> String {
    serde_json::to_string_pretty(scan_data).unwrap_or_else(|_| scan_data.to_string())
}

pub fn humanize(scan_data: &Value) -> String {
    format!(
        "You are a security specialist. Convert the following container vulnerability scan results \
into a human-readable format:\n\n{}\n\nFormat the output in a clear, structured way that is easy \
for non-technical stakeholders to understand.",
        pretty(scan_data)
    )
}

pub fn risk_analysis(scan_data: &Value, human_readable: &str) -> String {
    format!(
        "You are a security expert. Analyze the following container vulnerability scan results and \
identify the security risks.\n\nHuman-readable report:\n{}\n\nTechnical scan data:\n{}\n\n\
Highlight the most critical issues and their potential impact.",
        human_readable,
        pretty(scan_data)
    )
}

pub fn solutions(scan_data: &Value, human_readable: &str, risk_analysis: &str) -> String {
    format!(
        "You are a security specialist and DevSecOps engineer. Based on the following security risk \
analysis, suggest practical solutions and remediation steps.\n\nRisk analysis:\n{}\n\n\
Human-readable report:\n{}\n\nTechnical scan data:\n{}\n\n\
Provide actionable steps that can be taken to address these vulnerabilities.",
        risk_analysis,
        human_readable,
        pretty(scan_data)
    )
}
