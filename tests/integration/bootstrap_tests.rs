//! Organization bootstrap provisioning.

use crate::common::{create_organization, create_user, TestApp};
use voxboard::db::{
    BoardRepository, OrganizationRepository, StatusRepository, TagRepository,
};
use voxboard::services::bootstrap;

#[tokio::test]
async fn bootstrap_seeds_defaults_and_sets_the_default_status() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    assert!(org.default_status_id.is_none());

    bootstrap::run(&app.state.db, org.id, owner.id)
        .await
        .expect("bootstrap failed");

    let boards = BoardRepository::new(&app.state.db)
        .list_for_organization(org.id)
        .await
        .unwrap();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0].title, "Feature suggestions");

    let tags = TagRepository::new(&app.state.db)
        .list_for_organization(org.id)
        .await
        .unwrap();
    assert_eq!(tags.len(), 2);

    let statuses = StatusRepository::new(&app.state.db)
        .list_for_organization(org.id)
        .await
        .unwrap();
    assert_eq!(statuses.len(), 6);

    let refreshed = OrganizationRepository::new(&app.state.db)
        .get_by_id(org.id)
        .await
        .unwrap()
        .unwrap();
    let default_id = refreshed.default_status_id.expect("default status not set");
    let default = statuses.iter().find(|s| s.id == default_id).unwrap();
    assert_eq!(default.name, "open");
}

#[tokio::test]
async fn bootstrap_is_idempotent() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;

    bootstrap::run(&app.state.db, org.id, owner.id).await.unwrap();
    let first_default = OrganizationRepository::new(&app.state.db)
        .get_by_id(org.id)
        .await
        .unwrap()
        .unwrap()
        .default_status_id;

    bootstrap::run(&app.state.db, org.id, owner.id).await.unwrap();

    let boards = BoardRepository::new(&app.state.db)
        .list_for_organization(org.id)
        .await
        .unwrap();
    assert_eq!(boards.len(), 1);

    let statuses = StatusRepository::new(&app.state.db)
        .list_for_organization(org.id)
        .await
        .unwrap();
    assert_eq!(statuses.len(), 6);

    let tags = TagRepository::new(&app.state.db)
        .list_for_organization(org.id)
        .await
        .unwrap();
    assert_eq!(tags.len(), 2);

    let second_default = OrganizationRepository::new(&app.state.db)
        .get_by_id(org.id)
        .await
        .unwrap()
        .unwrap()
        .default_status_id;
    assert_eq!(first_default, second_default);
}

#[tokio::test]
async fn bootstrap_keeps_an_existing_default_status() {
    let app = TestApp::new().await;
    let owner = create_user(&app.state.db).await;
    let org = create_organization(&app.state.db, &owner).await;
    let custom = crate::common::create_status(&app.state.db, &org).await;

    OrganizationRepository::new(&app.state.db)
        .set_default_status(org.id, custom.id)
        .await
        .unwrap();

    bootstrap::run(&app.state.db, org.id, owner.id).await.unwrap();

    let refreshed = OrganizationRepository::new(&app.state.db)
        .get_by_id(org.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.default_status_id, Some(custom.id));
}
