//! Data factories
//!
//! Seed rows directly through the repositories so tests can arrange state
//! without going through the HTTP layer.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use fake::{faker::company::en::CompanyName, Fake};
use sqlx::SqlitePool;
use uuid::Uuid;

use voxboard::db::{
    BoardRepository, CommentRepository, MemberRepository, OrganizationRepository, PostRepository,
    StatusRepository, TagRepository, UserRepository,
};
use voxboard::models::{
    Board, Comment, CreateBoardRequest, CreateOrganizationRequest, CreatePostRequest,
    CreateStatusRequest, CreateTagRequest, Organization, Post, Role, Status, Tag, User,
};
use voxboard::services::AuthService;

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn next() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Password shared by every factory-created user.
pub const TEST_PASSWORD: &str = "correct horse battery";

pub async fn create_user(pool: &SqlitePool) -> User {
    let n = next();
    let hash = AuthService::hash_password(TEST_PASSWORD).expect("Failed to hash password");
    let user = User::new(
        format!("user_{}", n),
        format!("user_{}@example.com", n),
        hash,
    );
    UserRepository::new(pool)
        .create(&user)
        .await
        .expect("Failed to create user");
    user
}

/// Create an organization with the given user as its sole owner.
pub async fn create_organization(pool: &SqlitePool, owner: &User) -> Organization {
    let n = next();
    let name: String = CompanyName().fake();
    let org = OrganizationRepository::new(pool)
        .create(&CreateOrganizationRequest {
            name,
            slug: format!("org-{}", n),
            logo_url: None,
        })
        .await
        .expect("Failed to create organization");

    add_member(pool, &org, owner, Role::Owner).await;
    org
}

pub async fn add_member(pool: &SqlitePool, org: &Organization, user: &User, role: Role) {
    MemberRepository::new(pool)
        .add(org.id, user.id, role, &user.username)
        .await
        .expect("Failed to add member");
}

pub async fn create_board(pool: &SqlitePool, org: &Organization, author: &User) -> Board {
    let n = next();
    BoardRepository::new(pool)
        .create(
            org.id,
            author.id,
            &CreateBoardRequest {
                title: format!("Board {}", n),
                description: "A test board".to_string(),
                is_private: false,
            },
        )
        .await
        .expect("Failed to create board")
}

pub async fn create_post(pool: &SqlitePool, board: &Board, author: &User) -> Post {
    let n = next();
    PostRepository::new(pool)
        .create(
            board.id,
            author.id,
            None,
            &CreatePostRequest {
                title: format!("Post {}", n),
                description: "A test post".to_string(),
                is_private: false,
            },
        )
        .await
        .expect("Failed to create post")
}

pub async fn create_comment(pool: &SqlitePool, post: &Post, author: &User) -> Comment {
    CommentRepository::new(pool)
        .create(post.id, author.id, "A test comment")
        .await
        .expect("Failed to create comment")
}

pub async fn create_status(pool: &SqlitePool, org: &Organization) -> Status {
    let n = next();
    StatusRepository::new(pool)
        .create(
            Some(org.id),
            &CreateStatusRequest {
                name: format!("status-{}", n),
                color: "#577590".to_string(),
                sort_order: n as i64,
            },
        )
        .await
        .expect("Failed to create status")
}

pub async fn create_tag(pool: &SqlitePool, org: &Organization) -> Tag {
    let n = next();
    TagRepository::new(pool)
        .create(
            Some(org.id),
            &CreateTagRequest {
                name: format!("tag-{}", n),
                color: "#90be6d".to_string(),
            },
        )
        .await
        .expect("Failed to create tag")
}

/// Insert a global system-default tag, the kind no organization may delete.
pub async fn create_system_tag(pool: &SqlitePool) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO tags (id, organization_id, name, color, is_system_default, created_at, updated_at)
        VALUES (?, NULL, ?, ?, 1, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(format!("system-tag-{}", next()))
    .bind("#333333")
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .expect("Failed to create system tag");
    id
}

pub async fn lock_board(pool: &SqlitePool, board: &Board) {
    BoardRepository::new(pool)
        .set_locked(board.id, true)
        .await
        .expect("Failed to lock board");
}

pub async fn lock_post(pool: &SqlitePool, post: &Post) {
    PostRepository::new(pool)
        .set_locked(post.id, true)
        .await
        .expect("Failed to lock post");
}
