//! Instruction prompt rendering

use crate::report::UpgradeRow;

/// Render the instruction for one flagged reference
///
/// Pure function of the row and the (possibly truncated, possibly absent)
/// file content. The response contract and the change-type rubric are part
/// of the prompt; parsing depends on models honoring them.
pub fn build_instruction(row: &UpgradeRow, content: Option<&str>) -> String {
    format!(
        r#"We are upgrading from {old_group} {old_artifact} {old_version} to {target_group} {target_artifact} {target_version}.
I am aware that {line} has possibly changed or is deprecated. Review the source code and explain what changes need to be made to comply with the new libraries in {target_version}.

Your response should only consist of the following JSON object, no other text and no markdown:
    {{"change_type": "None", "change_description": "Details", "explanation": "Rationale"}}
Possible change types:
None, Simple, Moderate, Complex, System-wide

Meaning of change types:
None: No change is required. The code is already correct and does not need to be modified.
Simple: A small change or addition is needed. This could involve basic text search and replace, or a simple code addition.
Moderate: A moderate change or addition is needed. This could involve method changes, refactoring, or adding new functionality.
Complex: A large change or addition is needed. This could involve changes to multiple files or classes, or a significant refactoring effort.
System-wide: A change or addition that affects the entire system. This could involve changing the architecture of the system, or a significant refactoring effort that affects many parts of the codebase.

Here is the source code:
{source}
"#,
        old_group = row.old_group_id,
        old_artifact = row.old_artifact_id,
        old_version = row.old_version_id,
        target_group = row.target_group_id,
        target_artifact = row.target_artifact_id,
        target_version = row.target_version_id,
        line = row.line_content,
        source = content.unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> UpgradeRow {
        UpgradeRow {
            file_path: "Foo.java".into(),
            line_content: "import org.a.Old;".into(),
            old_group_id: "org.a".into(),
            old_artifact_id: "lib".into(),
            old_version_id: "1.0".into(),
            target_group_id: "org.b".into(),
            target_artifact_id: "lib-ng".into(),
            target_version_id: "2.0".into(),
        }
    }

    #[test]
    fn test_contains_coordinates_and_content() {
        let instruction = build_instruction(&sample_row(), Some("import org.a.Old;\nclass Foo {}"));

        assert!(instruction.contains("org.a lib 1.0"));
        assert!(instruction.contains("org.b lib-ng 2.0"));
        assert!(instruction.contains("I am aware that import org.a.Old; has possibly changed"));
        assert!(instruction.contains("import org.a.Old;\nclass Foo {}"));
    }

    #[test]
    fn test_states_response_contract() {
        let instruction = build_instruction(&sample_row(), Some("class Foo {}"));

        assert!(instruction.contains(r#"{"change_type": "None", "change_description": "Details", "explanation": "Rationale"}"#));
        for label in ["None", "Simple", "Moderate", "Complex", "System-wide"] {
            assert!(instruction.contains(label), "missing rubric label {label}");
        }
    }

    #[test]
    fn test_missing_content_renders_empty_source() {
        let instruction = build_instruction(&sample_row(), None);
        assert!(instruction.trim_end().ends_with("Here is the source code:"));
    }
}
