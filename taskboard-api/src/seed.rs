/// Demo data seeding
///
/// When enabled (`SEED_DEMO_DATA=true`) and the users table is empty,
/// creates the demo dataset: an admin, a moderator managing one project,
/// and a regular user with two tasks on it. All three accounts use the
/// password `password`.
use sqlx::PgPool;
use taskboard_shared::{
    auth::password,
    models::{
        project::{CreateProject, Project},
        task::{CreateTask, Task, TaskStatus},
        user::{CreateUser, Role, User},
    },
};
use tracing::info;

/// Seeds demo accounts, one project and two tasks
///
/// No-op when any user already exists.
pub async fn seed_demo_data(pool: &PgPool) -> anyhow::Result<()> {
    if User::count(pool).await? > 0 {
        info!("Users exist, skipping demo seed");
        return Ok(());
    }

    info!("Seeding demo data");

    User::create(
        pool,
        CreateUser {
            username: "admin".to_string(),
            password_hash: password::hash_password("password")?,
            role: Role::Admin,
            full_name: "System Admin".to_string(),
        },
    )
    .await?;

    let moderator = User::create(
        pool,
        CreateUser {
            username: "mod".to_string(),
            password_hash: password::hash_password("password")?,
            role: Role::Moderator,
            full_name: "Project Manager".to_string(),
        },
    )
    .await?;

    let user = User::create(
        pool,
        CreateUser {
            username: "user".to_string(),
            password_hash: password::hash_password("password")?,
            role: Role::User,
            full_name: "Developer One".to_string(),
        },
    )
    .await?;

    let project = Project::create(
        pool,
        CreateProject {
            name: "Website Redesign".to_string(),
            description: Some("Overhaul the main marketing site".to_string()),
            manager_id: Some(moderator.id),
            is_active: true,
        },
    )
    .await?;

    Task::create(
        pool,
        CreateTask {
            project_id: project.id,
            title: "Design Homepage".to_string(),
            description: Some("Create Figma mockups".to_string()),
            status: TaskStatus::InProgress,
            assigned_to_id: Some(user.id),
        },
    )
    .await?;

    Task::create(
        pool,
        CreateTask {
            project_id: project.id,
            title: "Setup CI/CD".to_string(),
            description: Some("Configure GitHub Actions".to_string()),
            status: TaskStatus::Open,
            assigned_to_id: Some(user.id),
        },
    )
    .await?;

    info!("Demo data seeded");

    Ok(())
}
