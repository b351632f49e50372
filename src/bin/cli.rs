use clap::{Parser, Subcommand};
use staffdesk::{
    db,
    models::filters::UserFilters,
    repositories::{SqliteRoleRepository, SqliteUserRepository},
    services::user_service::{CreateUserRequest, UpdatePasswordRequest, UserService},
    version::{read_version, write_version, Bump, SemVer},
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "staffdesk-cli")]
#[command(about = "Ops CLI for StaffDesk: user management and release versioning", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage the application version stored in the package manifest
    Version {
        /// Action: show | bump | patch | minor | major | set
        action: String,

        /// Bump part when the action is `bump` (patch, minor or major)
        part: Option<String>,

        /// Target version for `set`, e.g. --ver=1.4.0
        #[arg(long)]
        ver: Option<String>,

        /// Path to the package manifest
        #[arg(long, default_value = "package.json")]
        manifest: PathBuf,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new user
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,

        /// Roles to attach, e.g. --role admin --role employee
        #[arg(long = "role")]
        roles: Vec<String>,
    },

    /// List users
    List {
        /// Filter by name or email
        #[arg(short, long, default_value = "")]
        search: String,

        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,
    },

    /// Set a new password for a user
    SetPassword {
        /// Email address of the user
        #[arg(short, long)]
        email: String,

        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Attach a role to a user
    AssignRole {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        role: String,
    },

    /// Detach a role from a user
    RevokeRole {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        role: String,
    },
}

async fn get_password(prompt: &str) -> anyhow::Result<String> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

async fn confirm_password(prompt: &str) -> anyhow::Result<(String, String)> {
    let password = get_password(prompt).await?;
    let confirm = get_password("Confirm password").await?;
    Ok((password, confirm))
}

/// Exit code semantics: 0 on success, 1 on an invalid action, a malformed
/// version or a missing --ver. The action is a free-form string so those
/// failures stay ours rather than the argument parser's.
fn run_version(action: &str, part: Option<&str>, ver: Option<&str>, manifest: &PathBuf) -> i32 {
    let current = read_version(manifest);

    match action {
        "show" => {
            println!("{current}");
            0
        }
        "bump" | "patch" | "minor" | "major" => {
            let bump = if action == "bump" {
                match Bump::parse(part.unwrap_or("patch")) {
                    Some(bump) => bump,
                    None => {
                        eprintln!("Invalid bump part: {}", part.unwrap_or(""));
                        return 1;
                    }
                }
            } else {
                // `patch`/`minor`/`major` are shorthands for `bump <part>`.
                match Bump::parse(action) {
                    Some(bump) => bump,
                    None => unreachable!(),
                }
            };

            let parsed: SemVer = match current.parse() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Invalid version in manifest: {current}");
                    return 1;
                }
            };

            let next = parsed.bump(bump);
            write_version(manifest, &next);
            println!("{next}");
            0
        }
        "set" => {
            let Some(raw) = ver else {
                eprintln!("--ver is required for set");
                return 1;
            };

            let next: SemVer = match raw.parse() {
                Ok(next) => next,
                Err(_) => {
                    eprintln!("Invalid version: {raw}");
                    return 1;
                }
            };

            write_version(manifest, &next);
            println!("{next}");
            0
        }
        other => {
            eprintln!("Invalid action: {other}");
            1
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // The version command is pure file manipulation; no database needed.
    if let Commands::Version {
        action,
        part,
        ver,
        manifest,
    } = &cli.command
    {
        let code = run_version(action, part.as_deref(), ver.as_deref(), manifest);
        std::process::exit(code);
    }

    let pool = db::create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let role_repository = Arc::new(SqliteRoleRepository::new(pool.clone()));
    let user_service = Arc::new(UserService::new(user_repository, role_repository));

    match cli.command {
        Commands::Version { .. } => unreachable!(),
        Commands::User { command } => match command {
            UserCommands::Create {
                name,
                email,
                password,
                roles,
            } => {
                let (password, password_confirm) = if let Some(pw) = password {
                    (pw.clone(), pw)
                } else {
                    confirm_password("Password").await?
                };

                if password != password_confirm {
                    eprintln!("Passwords do not match");
                    std::process::exit(1);
                }

                let request = CreateUserRequest {
                    name: name.clone(),
                    email: email.clone(),
                    password,
                    password_confirm: Some(password_confirm),
                    roles,
                };

                match user_service.create_user(request).await {
                    Ok(user) => {
                        println!("User created successfully!");
                        println!("  ID: {}", user.id);
                        println!("  Name: {}", user.name);
                        println!("  Email: {}", user.email);
                    }
                    Err(err) => {
                        eprintln!("Failed to create user: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::List { search, limit } => {
                let filters = UserFilters {
                    search,
                    per_page: limit,
                    ..UserFilters::default()
                };

                match user_service.list_users(&filters).await {
                    Ok(users) => {
                        if users.is_empty() {
                            println!("No users found");
                        }
                        for user in users {
                            println!("{}\t{}\t{}", user.id, user.name, user.email);
                        }
                    }
                    Err(err) => {
                        eprintln!("Failed to list users: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::SetPassword { email, password } => {
                let user = match user_service.find_user_by_email(&email).await {
                    Ok(Some(user)) => user,
                    Ok(None) => {
                        eprintln!("No user with email {}", email);
                        std::process::exit(1);
                    }
                    Err(err) => {
                        eprintln!("Lookup failed: {}", err);
                        std::process::exit(1);
                    }
                };

                let (password, password_confirm) = if let Some(pw) = password {
                    (pw.clone(), pw)
                } else {
                    confirm_password("New password").await?
                };

                let request = UpdatePasswordRequest {
                    user_id: user.id,
                    new_password: password,
                    new_password_confirm: Some(password_confirm),
                };

                match user_service.update_password(request).await {
                    Ok(()) => println!("Password updated for {}", email),
                    Err(err) => {
                        eprintln!("Failed to update password: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::AssignRole { email, role } => {
                match find_user_id(&user_service, &email).await {
                    Some(user_id) => match user_service.attach_role(user_id, &role).await {
                        Ok(()) => println!("Attached role {} to {}", role, email),
                        Err(err) => {
                            eprintln!("Failed to attach role: {}", err);
                            std::process::exit(1);
                        }
                    },
                    None => {
                        eprintln!("No user with email {}", email);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::RevokeRole { email, role } => {
                match find_user_id(&user_service, &email).await {
                    Some(user_id) => match user_service.detach_role(user_id, &role).await {
                        Ok(()) => println!("Detached role {} from {}", role, email),
                        Err(err) => {
                            eprintln!("Failed to detach role: {}", err);
                            std::process::exit(1);
                        }
                    },
                    None => {
                        eprintln!("No user with email {}", email);
                        std::process::exit(1);
                    }
                }
            }
        },
    }

    Ok(())
}

async fn find_user_id(user_service: &UserService, email: &str) -> Option<i64> {
    user_service
        .find_user_by_email(email)
        .await
        .ok()
        .flatten()
        .map(|user| user.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest_with(version: &str, dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("package.json");
        std::fs::write(
            &path,
            format!(r#"{{"name": "staffdesk", "version": "{version}"}}"#),
        )
        .unwrap();
        path
    }

    #[test]
    fn bump_actions_rewrite_the_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = manifest_with("1.2.3", &dir);

        assert_eq!(run_version("bump", Some("patch"), None, &path), 0);
        assert_eq!(read_version(&path), "1.2.4");

        assert_eq!(run_version("minor", None, None, &path), 0);
        assert_eq!(read_version(&path), "1.3.0");

        assert_eq!(run_version("major", None, None, &path), 0);
        assert_eq!(read_version(&path), "2.0.0");
    }

    #[test]
    fn set_requires_a_well_formed_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = manifest_with("1.2.3", &dir);

        assert_eq!(run_version("set", None, Some("9.9.9"), &path), 0);
        assert_eq!(read_version(&path), "9.9.9");

        // Failure leaves the manifest untouched.
        assert_eq!(run_version("set", None, Some("invalid"), &path), 1);
        assert_eq!(read_version(&path), "9.9.9");

        assert_eq!(run_version("set", None, None, &path), 1);
        assert_eq!(read_version(&path), "9.9.9");
    }

    #[test]
    fn invalid_action_exits_nonzero() {
        let dir = tempfile::tempdir().unwrap();
        let path = manifest_with("1.2.3", &dir);

        assert_eq!(run_version("rollback", None, None, &path), 1);
        assert_eq!(run_version("bump", Some("mega"), None, &path), 1);
        assert_eq!(read_version(&path), "1.2.3");
    }

    #[test]
    fn show_on_missing_manifest_reads_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        assert_eq!(run_version("show", None, None, &path), 0);
        assert_eq!(read_version(&path), "0.0.0");
    }
}
