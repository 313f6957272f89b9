/// Role-based authorization decisions
///
/// Every decision is a pure, deterministic function of the actor and (for
/// ownership rules) the resource. The API consults these before every
/// mutation and before scoping list results; a failed check surfaces as
/// 403 Forbidden, distinguishable from 404 Not Found.
///
/// The rules, exactly:
///
/// | Operation | admin | moderator | user |
/// |---|---|---|---|
/// | Project create | yes | yes | no |
/// | Project read (single) | yes | yes | yes |
/// | Project list | all | managed only | all |
/// | Project update/delete | **no** | owning manager only | no |
/// | Task create | yes | yes | no |
/// | Task list | all | managed projects | assigned only |
/// | Task update/delete | assignee/manager rule | assignee/manager rule | assignee/manager rule |
/// | User list (all) | yes | no | no |
/// | User list (role=user) | yes | yes | no |
/// | Analytics | yes | no | no |
///
/// Two quirks are carried over from the reference behavior on purpose:
/// admins can create projects but cannot update or delete them (only the
/// owning moderator can), and admins get no blanket task-update right -
/// they pass the task rule only as assignee or manager like anyone else.
///
/// Matches over [`Role`] are exhaustive: adding a role fails compilation
/// at every decision site.
use crate::models::project::Project;
use crate::models::task::Task;
use crate::models::user::{Role, User};

/// Can the actor create projects?
pub fn can_create_project(role: Role) -> bool {
    match role {
        Role::Admin => true,
        Role::Moderator => true,
        Role::User => false,
    }
}

/// Can the actor update or delete this project?
///
/// Only the moderator who manages it. Admins are deliberately excluded.
pub fn can_manage_project(actor: &User, project: &Project) -> bool {
    match actor.role {
        Role::Admin => false,
        Role::Moderator => project.manager_id == Some(actor.id),
        Role::User => false,
    }
}

/// Can the actor create tasks?
pub fn can_create_task(role: Role) -> bool {
    match role {
        Role::Admin => true,
        Role::Moderator => true,
        Role::User => false,
    }
}

/// Can the actor update or delete this task?
///
/// The assignee, or the moderator managing the task's parent project. One
/// coarse rule for every field combination, including status transitions
/// (see the workflow notes in [`crate::models::task`]). `project` is the
/// task's parent, `None` if it no longer resolves.
pub fn can_modify_task(actor: &User, task: &Task, project: Option<&Project>) -> bool {
    if task.assigned_to_id == Some(actor.id) {
        return true;
    }

    match actor.role {
        Role::Admin => false,
        Role::Moderator => project.is_some_and(|p| p.manager_id == Some(actor.id)),
        Role::User => false,
    }
}

/// Can the actor list every user account?
pub fn can_list_all_users(role: Role) -> bool {
    match role {
        Role::Admin => true,
        Role::Moderator => false,
        Role::User => false,
    }
}

/// Can the actor list regular users (the assignee picker)?
pub fn can_list_assignable_users(role: Role) -> bool {
    match role {
        Role::Admin => true,
        Role::Moderator => true,
        Role::User => false,
    }
}

/// Can the actor view the analytics report?
pub fn can_view_analytics(role: Role) -> bool {
    match role {
        Role::Admin => true,
        Role::Moderator => false,
        Role::User => false,
    }
}
