use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::{Value, json};

use crate::api::{self, AskRequest, ProfileUpdate};
use crate::cli::{Cli, Commands, RecordKind, SearchKind};
use crate::client::{ApiClient, CancelToken, StreamClient, TerminalNotifier};
use crate::config::Config;
use crate::consts::DEFAULT_CONNECT_TIMEOUT;
use crate::error::{ApiError, AppError};
use crate::output::{
    output_event_json, output_json, output_navigation_json, print_guard_decision,
    print_history_table, print_profile, print_routes_table, print_search_table, print_stats,
};
use crate::router::{GuardDecision, Navigation, before_each, routes};
use crate::session::{Credentials, Registration, SessionStore};
use crate::storage::FileStorage;

pub(crate) struct CommandContext<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) endpoints: &'a Config,
    pub(crate) session: &'a SessionStore,
    pub(crate) client: &'a ApiClient<'a>,
    pub(crate) use_color: bool,
}

fn storage_path(endpoints: &Config) -> PathBuf {
    endpoints
        .storage_path
        .clone()
        .or_else(FileStorage::default_path)
        .unwrap_or_else(|| {
            tracing::warn!("no data directory found, keeping the session in ./storage.json");
            PathBuf::from("storage.json")
        })
}

/// Build the session and client, then run the selected command
pub(crate) fn run(cli: &Cli) -> Result<(), AppError> {
    let endpoints = cli.endpoints();
    let use_color = cli.use_color();

    let storage = FileStorage::new(storage_path(&endpoints));
    tracing::debug!(path = %storage.path().display(), "session storage");
    let session = SessionStore::load(Box::new(storage));

    let notifier = TerminalNotifier::new(use_color);
    let client = ApiClient::new(
        &endpoints.base_url(),
        endpoints.timeout(),
        &session,
        &notifier,
    );

    let ctx = CommandContext {
        cli,
        endpoints: &endpoints,
        session: &session,
        client: &client,
        use_color,
    };
    handle_command(&ctx)
}

fn handle_command(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    match &ctx.cli.command {
        Commands::Login {
            username,
            password,
            redirect,
        } => {
            let credentials = Credentials {
                username: username.clone(),
                password: password.clone(),
            };
            ctx.session.login(ctx.client, &credentials)?;
            report_signed_in(ctx, redirect);
            Ok(())
        }
        Commands::Register {
            username,
            password,
            nickname,
            email,
        } => {
            let details = Registration {
                username: username.clone(),
                password: password.clone(),
                nickname: nickname.clone(),
                email: email.clone(),
            };
            ctx.session.register(ctx.client, &details)?;
            report_signed_in(ctx, "/home");
            Ok(())
        }
        Commands::Logout => {
            ctx.session.logout()?;
            println!("Signed out.");
            Ok(())
        }
        Commands::Whoami => handle_whoami(ctx),
        Commands::Profile {
            nickname,
            email,
            phone,
        } => {
            let update = ProfileUpdate {
                nickname: nickname.clone(),
                email: email.clone(),
                phone: phone.clone(),
            };
            handle_profile(ctx, &update)
        }
        Commands::Ask {
            question,
            session_id,
            stream,
            cancel_after,
        } => {
            let request = AskRequest {
                question: question.clone(),
                session_id: session_id.clone(),
            };
            if *stream {
                let cancel_after =
                    cancel_after.and_then(|secs| Duration::try_from_secs_f64(secs).ok());
                handle_ask_stream(ctx, &request, cancel_after)
            } else {
                handle_ask(ctx, &request)
            }
        }
        Commands::History { page, size } => {
            let data = api::question_history(ctx.client, *page, *size)?;
            if ctx.cli.json {
                println!("{}", output_json(&data));
            } else {
                print_history_table(&data, ctx.use_color);
            }
            Ok(())
        }
        Commands::Search {
            kind,
            keyword,
            page,
            size,
        } => handle_search(ctx, *kind, keyword, *page, *size),
        Commands::Stats => handle_stats(ctx),
        Commands::Delete { kind, id } => handle_delete(ctx, *kind, *id),
        Commands::Route { path } => {
            match path {
                Some(path) => {
                    let nav = before_each(path, ctx.session.storage());
                    if ctx.cli.json {
                        println!("{}", output_navigation_json(&nav));
                    } else {
                        print_guard_decision(
                            &nav.resolved.full_path,
                            &nav.decision,
                            ctx.use_color,
                        );
                    }
                }
                None => print_routes_table(routes(), ctx.use_color),
            }
            Ok(())
        }
    }
}

/// Where the user lands once signed in
fn report_signed_in(ctx: &CommandContext<'_>, redirect: &str) {
    let nav = before_each(redirect, ctx.session.storage());
    let landing = landing_path(&nav);

    if ctx.cli.json {
        let profile = ctx.session.profile().as_ref().map(|p| p.as_value());
        println!(
            "{}",
            output_json(&json!({"user": profile, "landing": landing}))
        );
        return;
    }

    let profile = ctx.session.profile();
    let name = profile
        .as_ref()
        .and_then(|p| p.display_name())
        .unwrap_or("user");
    println!("Signed in as {name}.");
    println!("Continue to {landing}");
}

fn landing_path(nav: &Navigation) -> String {
    match &nav.decision {
        GuardDecision::Allowed => nav.resolved.full_path.clone(),
        GuardDecision::RedirectLogin { redirect } => {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("redirect", redirect)
                .finish();
            format!("/login?{query}")
        }
        GuardDecision::RedirectHome => "/home".to_string(),
    }
}

/// Gate a command on the page it corresponds to
fn require_page(ctx: &CommandContext<'_>, path: &str) -> Result<(), AppError> {
    match before_each(path, ctx.session.storage()).decision {
        GuardDecision::Allowed => Ok(()),
        GuardDecision::RedirectLogin { .. } => Err(AppError::NotLoggedIn),
        GuardDecision::RedirectHome => Err(AppError::Forbidden {
            path: path.to_string(),
        }),
    }
}

fn handle_whoami(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    let session = ctx.session.snapshot();
    if !session.is_authenticated() {
        return Err(AppError::NotLoggedIn);
    }
    if ctx.cli.json {
        let profile = session.profile.as_ref().map_or(Value::Null, |p| p.as_value());
        println!("{}", output_json(&profile));
    } else {
        print_profile(&session.token, session.profile.as_ref(), ctx.use_color);
    }
    Ok(())
}

fn handle_profile(ctx: &CommandContext<'_>, update: &ProfileUpdate) -> Result<(), AppError> {
    require_page(ctx, "/profile")?;
    if update.is_empty() {
        return handle_whoami(ctx);
    }

    let data = api::update_profile(ctx.client, update)?;
    // The backend echoes the saved user; fall back to what was sent
    let partial = match data {
        Value::Object(user) => user,
        _ => match serde_json::to_value(update)? {
            Value::Object(sent) => sent,
            _ => serde_json::Map::new(),
        },
    };
    if !ctx.session.update_profile(&partial)? {
        tracing::warn!("no stored profile to update");
    }

    if ctx.cli.json {
        println!("{}", output_json(&Value::Object(partial)));
    } else {
        println!("Profile updated.");
    }
    Ok(())
}

fn handle_ask(ctx: &CommandContext<'_>, request: &AskRequest) -> Result<(), AppError> {
    let data = api::ask(ctx.client, request)?;
    if ctx.cli.json {
        println!("{}", output_json(&data));
        return Ok(());
    }

    match data.get("answer").and_then(Value::as_str) {
        Some(answer) => println!("{answer}"),
        None => println!("{}", output_json(&data)),
    }
    if let Some(session_id) = data.get("sessionId").and_then(Value::as_str) {
        eprintln!("session: {session_id}");
    }
    Ok(())
}

fn handle_ask_stream(
    ctx: &CommandContext<'_>,
    request: &AskRequest,
    cancel_after: Option<Duration>,
) -> Result<(), AppError> {
    let cancel = CancelToken::new();
    if let Some(delay) = cancel_after {
        // Detached: the timer only flips the flag
        let _ = cancel.cancel_after(delay);
    }

    let client = StreamClient::new(&ctx.endpoints.stream_url(), DEFAULT_CONNECT_TIMEOUT);
    let token = ctx.session.token();
    let response = client
        .open(request, token.as_deref(), &cancel)
        .map_err(AppError::Stream)?;
    if !response.is_success() {
        tracing::warn!(status = response.status, "stream rejected");
        return Err(AppError::StreamStatus {
            status: response.status,
        });
    }

    if let Some(content_type) = response
        .content_type
        .as_deref()
        .filter(|ct| !ct.starts_with("text/event-stream"))
    {
        tracing::warn!(content_type, "unexpected stream content type");
    }

    let mut stdout = std::io::stdout().lock();
    let mut wrote_text = false;
    for event in response.events() {
        let event = event.map_err(|e| {
            AppError::Stream(ApiError::Network {
                detail: e.to_string(),
            })
        })?;
        if ctx.cli.json {
            let _ = writeln!(stdout, "{}", output_event_json(&event));
        }

        match event.event.as_str() {
            "start" => {
                tracing::debug!(session_id = %event.data, "stream started");
                if !ctx.cli.json {
                    eprintln!("session: {}", event.data);
                }
            }
            "end" => break,
            "error" => {
                return Err(AppError::Stream(ApiError::Unknown { detail: event.data }));
            }
            _ if !ctx.cli.json => {
                let _ = write!(stdout, "{}", event.data);
                let _ = stdout.flush();
                wrote_text = true;
            }
            _ => {}
        }
    }

    if wrote_text {
        let _ = writeln!(stdout);
    }
    if cancel.is_cancelled() {
        eprintln!("(stopped)");
    }
    Ok(())
}

fn handle_search(
    ctx: &CommandContext<'_>,
    kind: SearchKind,
    keyword: &str,
    page: u32,
    size: u32,
) -> Result<(), AppError> {
    let data = api::search(ctx.client, kind, keyword, page, size)?;
    if ctx.cli.json {
        println!("{}", output_json(&data));
    } else {
        print_search_table(kind, &data, ctx.use_color);
    }
    Ok(())
}

fn handle_stats(ctx: &CommandContext<'_>) -> Result<(), AppError> {
    require_page(ctx, "/admin/dashboard")?;
    let data = api::admin_stats(ctx.client)?;
    if ctx.cli.json {
        println!("{}", output_json(&data));
    } else {
        print_stats(&data, ctx.use_color);
    }
    Ok(())
}

fn handle_delete(ctx: &CommandContext<'_>, kind: RecordKind, id: u64) -> Result<(), AppError> {
    require_page(ctx, kind.page())?;
    api::delete_record(ctx.client, kind, id)?;
    println!("Deleted {} {id}.", kind.resource());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn landing_follows_guard() {
        let storage =
            MemoryStorage::with_items(&[("token", "T1"), ("userInfo", r#"{"userType":0}"#)]);
        assert_eq!(
            landing_path(&before_each("/profile?tab=2", &storage)),
            "/profile?tab=2"
        );
        assert_eq!(landing_path(&before_each("/admin", &storage)), "/home");

        let empty = MemoryStorage::default();
        assert_eq!(
            landing_path(&before_each("/profile", &empty)),
            "/login?redirect=%2Fprofile"
        );
        assert_eq!(
            landing_path(&before_each("/admin/qa?page=2&x=1", &empty)),
            "/login?redirect=%2Fadmin%2Fqa%3Fpage%3D2%26x%3D1"
        );
    }

    #[test]
    fn explicit_storage_path_wins() {
        let endpoints = Config {
            storage_path: Some(PathBuf::from("/tmp/custom.json")),
            ..Config::default()
        };
        assert_eq!(storage_path(&endpoints), PathBuf::from("/tmp/custom.json"));
    }
}
