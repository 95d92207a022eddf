use projboard_core::{Project, ProjectStatus};
use uuid::Uuid;

#[test]
fn project_serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut project = Project::with_id(id, "Build API", "v1", 3);
    project.status = ProjectStatus::Finished;

    let json = serde_json::to_value(&project).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["title"], "Build API");
    assert_eq!(json["description"], "v1");
    assert_eq!(json["people"], 3);
    assert_eq!(json["status"], "finished");

    let decoded: Project = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, project);
}

#[test]
fn persons_label_boundary() {
    assert_eq!(Project::new("a", "", 1).persons_label(), "1 person");
    assert_eq!(Project::new("a", "", 2).persons_label(), "2 persons");
}
