use projects_core::db::schema::ensure_schema;
use projects_core::db::{open_db, DbConfig, DbError};
use projects_core::{Decimal2, Project, ProjectRepository, RepoError, SqliteProjectRepository};
use rusqlite::{params, Connection};
use tempfile::TempDir;

#[test]
fn insert_then_fetch_by_id_roundtrips_scalar_fields() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();

    let inserted = repo.insert_project(build_shed()).unwrap();
    let project_id = inserted.project_id.unwrap();
    assert!(project_id > 0);

    let loaded = repo.fetch_project_by_id(project_id).unwrap().unwrap();
    assert_eq!(loaded, inserted);
    assert_eq!(loaded.estimated_hours.unwrap().to_string(), "12.50");
    assert_eq!(loaded.actual_hours.unwrap().to_string(), "0.00");
    assert!(loaded.has_no_children());
}

#[test]
fn insert_assigns_distinct_ids() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();

    let first = repo.insert_project(Project::new("Bench")).unwrap();
    let second = repo.insert_project(Project::new("Bench")).unwrap();
    assert_ne!(first.project_id, second.project_id);
}

#[test]
fn fetch_by_unknown_id_returns_none() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();

    assert!(repo.fetch_project_by_id(42).unwrap().is_none());
}

#[test]
fn fetch_all_on_empty_store_returns_empty_list() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();

    assert!(repo.fetch_all_projects().unwrap().is_empty());
}

#[test]
fn fetch_all_orders_by_name_and_omits_children() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();

    for name in ["Zebra stool", "Apple crate", "Mango rack"] {
        repo.insert_project(Project::new(name)).unwrap();
    }
    let apple_id = project_id_by_name(&config, "Apple crate");
    seed_children(&config, apple_id);

    let first = repo.fetch_all_projects().unwrap();
    let names: Vec<_> = first.iter().map(|p| p.project_name.as_str()).collect();
    assert_eq!(names, ["Apple crate", "Mango rack", "Zebra stool"]);
    assert!(first.iter().all(Project::has_no_children));

    let second = repo.fetch_all_projects().unwrap();
    assert_eq!(first, second);
}

#[test]
fn fetch_by_id_loads_every_child_collection() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();

    let target = repo.insert_project(build_shed()).unwrap();
    let other = repo.insert_project(Project::new("Birdhouse")).unwrap();
    let target_id = target.project_id.unwrap();
    seed_children(&config, target_id);
    seed_children(&config, other.project_id.unwrap());

    let loaded = repo.fetch_project_by_id(target_id).unwrap().unwrap();
    assert_eq!(loaded.steps.len(), 3);
    assert_eq!(loaded.materials.len(), 2);
    assert_eq!(loaded.categories.len(), 2);
    assert!(loaded.steps.iter().all(|s| s.project_id == target_id));
    assert!(loaded.materials.iter().all(|m| m.project_id == target_id));

    let mut step_orders: Vec<_> = loaded.steps.iter().map(|s| s.step_order).collect();
    step_orders.sort_unstable();
    assert_eq!(step_orders, [1, 2, 3]);

    let lumber = loaded
        .materials
        .iter()
        .find(|m| m.material_name == "2x4 lumber")
        .unwrap();
    assert_eq!(lumber.num_required, Some(12));
    assert_eq!(lumber.cost, Some(Decimal2::from_hundredths(799)));

    let mut category_names: Vec<_> = loaded
        .categories
        .iter()
        .map(|c| c.category_name.as_str())
        .collect();
    category_names.sort_unstable();
    assert_eq!(category_names, ["Garden", "Woodworking"]);
}

#[test]
fn update_existing_project_changes_only_that_row() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();

    let mut target = repo.insert_project(build_shed()).unwrap();
    let bystander = repo.insert_project(Project::new("Birdhouse")).unwrap();

    target.project_name = "Build Big Shed".to_string();
    target.actual_hours = Some("3.25".parse().unwrap());
    target.difficulty = Some(4);
    target.notes = None;
    assert!(repo.update_project(&target).unwrap());

    let loaded = repo
        .fetch_project_by_id(target.project_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(loaded, target);

    let untouched = repo
        .fetch_project_by_id(bystander.project_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(untouched, bystander);
}

#[test]
fn update_unknown_id_returns_false_and_changes_nothing() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();
    repo.insert_project(build_shed()).unwrap();
    let before = repo.fetch_all_projects().unwrap();

    let mut ghost = build_shed();
    ghost.project_id = Some(99999);
    ghost.project_name = "Ghost".to_string();
    assert!(!repo.update_project(&ghost).unwrap());

    assert_eq!(repo.fetch_all_projects().unwrap(), before);
}

#[test]
fn update_without_id_is_rejected() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();

    let err = repo.update_project(&build_shed()).unwrap_err();
    assert!(matches!(err, RepoError::MissingProjectId));
}

#[test]
fn delete_existing_project_cascades_to_children() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();

    let project_id = repo.insert_project(build_shed()).unwrap().project_id.unwrap();
    seed_children(&config, project_id);

    assert!(repo.delete_project(project_id).unwrap());
    assert!(repo.fetch_project_by_id(project_id).unwrap().is_none());

    let conn = open_db(&config).unwrap();
    for table in ["step", "material", "project_category"] {
        assert_eq!(count_rows(&conn, table), 0, "{table} rows survived delete");
    }
    assert_eq!(count_rows(&conn, "category"), 3);
}

#[test]
fn delete_unknown_id_returns_false() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();
    repo.insert_project(build_shed()).unwrap();

    assert!(!repo.delete_project(99999).unwrap());
    assert_eq!(repo.fetch_all_projects().unwrap().len(), 1);
}

#[test]
fn failed_insert_leaves_no_row_behind() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();
    open_db(&config)
        .unwrap()
        .execute_batch(
            "CREATE TRIGGER reject_boom BEFORE INSERT ON project
             WHEN NEW.project_name = 'boom'
             BEGIN SELECT RAISE(ABORT, 'rejected by trigger'); END;",
        )
        .unwrap();

    let err = repo.insert_project(Project::new("boom")).unwrap_err();
    assert!(matches!(err, RepoError::Db(DbError::Sqlite(_))));
    assert!(repo.fetch_all_projects().unwrap().is_empty());

    repo.insert_project(Project::new("fine")).unwrap();
    assert_eq!(repo.fetch_all_projects().unwrap().len(), 1);
}

#[test]
fn hours_at_column_bounds_roundtrip_and_one_past_is_rejected() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();

    let widest = Project {
        estimated_hours: Some(Decimal2::MAX),
        actual_hours: Some(Decimal2::MIN),
        ..Project::new("Barn")
    };
    let stored = repo.insert_project(widest).unwrap();
    let loaded = repo
        .fetch_project_by_id(stored.project_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(loaded, stored);
    assert_eq!(loaded.estimated_hours.unwrap().to_string(), "99999.99");

    let too_big = Project {
        estimated_hours: Some(Decimal2::from_hundredths(10_000_000)),
        ..Project::new("Castle")
    };
    let err = repo.insert_project(too_big).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Db(DbError::Sqlite(rusqlite::Error::ToSqlConversionFailure(_)))
    ));

    let all = repo.fetch_all_projects().unwrap();
    let names: Vec<_> = all.iter().map(|p| p.project_name.as_str()).collect();
    assert_eq!(names, ["Barn"]);
}

#[test]
fn failed_child_query_rolls_back_and_releases_the_database() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();
    let project_id = repo.insert_project(build_shed()).unwrap().project_id.unwrap();

    open_db(&config)
        .unwrap()
        .execute_batch("DROP TABLE material;")
        .unwrap();

    let err = repo.fetch_project_by_id(project_id).unwrap_err();
    assert!(matches!(err, RepoError::Db(DbError::Sqlite(_))));

    let mut renamed = build_shed();
    renamed.project_id = Some(project_id);
    renamed.project_name = "Still writable".to_string();
    assert!(repo.update_project(&renamed).unwrap());
}

#[test]
fn store_rejects_database_without_project_tables() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::new(dir.path().join("empty.db"));

    let result = SqliteProjectRepository::try_new(&config);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("project"))
    ));
}

#[test]
fn store_reports_unreachable_database_as_connect_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::new(dir.path().join("missing").join("projects.db"));

    match SqliteProjectRepository::try_new(&config) {
        Err(RepoError::Db(DbError::Connect { path, .. })) => assert_eq!(path, config.path),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected connect error"),
    }
}

#[test]
fn fetched_project_serializes_hours_as_fixed_strings() {
    let (_dir, config) = fresh_database();
    let repo = SqliteProjectRepository::try_new(&config).unwrap();
    let project_id = repo.insert_project(build_shed()).unwrap().project_id.unwrap();

    let loaded = repo.fetch_project_by_id(project_id).unwrap().unwrap();
    let json = serde_json::to_value(&loaded).unwrap();
    assert_eq!(json["estimated_hours"], "12.50");
    assert_eq!(json["actual_hours"], "0.00");
    assert_eq!(json["steps"], serde_json::json!([]));
}

fn fresh_database() -> (TempDir, DbConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::new(dir.path().join("projects.db"));
    let mut conn = open_db(&config).unwrap();
    ensure_schema(&mut conn).unwrap();
    (dir, config)
}

fn build_shed() -> Project {
    Project {
        estimated_hours: Some("12.50".parse().unwrap()),
        actual_hours: Some("0.00".parse().unwrap()),
        difficulty: Some(3),
        notes: Some("none".to_string()),
        ..Project::new("Build Shed")
    }
}

/// Adds 3 steps, 2 materials and 2 linked categories (plus one unlinked).
fn seed_children(config: &DbConfig, project_id: i64) {
    let conn = open_db(config).unwrap();
    for (order, text) in [(1, "Level the ground"), (2, "Frame walls"), (3, "Add roof")] {
        conn.execute(
            "INSERT INTO step (project_id, step_text, step_order) VALUES (?1, ?2, ?3);",
            params![project_id, text, order],
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO material (project_id, material_name, num_required, cost)
         VALUES (?1, '2x4 lumber', 12, '7.99'), (?1, 'Nails', NULL, NULL);",
        [project_id],
    )
    .unwrap();

    for name in ["Woodworking", "Garden", "Plumbing"] {
        conn.execute(
            "INSERT INTO category (category_name)
             SELECT ?1 WHERE NOT EXISTS (SELECT 1 FROM category WHERE category_name = ?1);",
            [name],
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO project_category (project_id, category_id)
         SELECT ?1, category_id FROM category
         WHERE category_name IN ('Woodworking', 'Garden');",
        [project_id],
    )
    .unwrap();
}

fn project_id_by_name(config: &DbConfig, name: &str) -> i64 {
    open_db(config)
        .unwrap()
        .query_row(
            "SELECT project_id FROM project WHERE project_name = ?1;",
            [name],
            |row| row.get(0),
        )
        .unwrap()
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}
