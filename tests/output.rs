use project_tracker::output::{format_human, HumanOutput};

#[test]
fn format_human_includes_sections() {
    let mut human = HumanOutput::new("Updated task #1: Implement add-task");
    human.push_summary("Status", "todo -> doing");
    human.set_table("| table |".to_string());
    human.push_next_step("project-tracker list-tasks");

    let rendered = format_human(&human);
    assert!(rendered.contains("Updated task #1: Implement add-task"));
    assert!(rendered.contains("  Status: todo -> doing"));
    assert!(rendered.contains("| table |"));
    assert!(rendered.contains("Next steps:"));
    assert!(rendered.contains("- project-tracker list-tasks"));
}

#[test]
fn format_human_omits_empty_sections() {
    let human = HumanOutput::new("Updated project #1");
    let rendered = format_human(&human);
    assert_eq!(rendered, "Updated project #1");
}
