use anyhow::Context;
use tracing::info;

use crate::{
    auth::password::hash_password,
    config::SeedConfig,
    users::{
        repo::UserStore,
        repo_types::{NewUser, Role, User},
    },
};

/// Creates the default admin and client accounts when their emails are free.
/// Existing accounts are left untouched.
pub async fn seed_default_users(users: &dyn UserStore, cfg: &SeedConfig) -> anyhow::Result<()> {
    if !cfg.enabled {
        info!("seeding disabled");
        return Ok(());
    }
    ensure_user(users, "Admin", &cfg.admin_email, "7000000000", &cfg.admin_password, Role::Admin)
        .await?;
    ensure_user(
        users,
        "Client User",
        &cfg.client_email,
        "7000000001",
        &cfg.client_password,
        Role::Client,
    )
    .await?;
    Ok(())
}

async fn ensure_user(
    users: &dyn UserStore,
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<User> {
    let email = email.trim().to_lowercase();
    if let Some(existing) = users.find_by_email(&email).await? {
        return Ok(existing);
    }
    let user = users
        .create(NewUser {
            name: name.into(),
            email: email.clone(),
            phone: phone.into(),
            password_hash: hash_password(password)?,
            role,
        })
        .await
        .with_context(|| format!("seed user {}", email))?;
    info!(user_id = %user.id, %email, role = ?role, "seeded user");
    Ok(user)
}
