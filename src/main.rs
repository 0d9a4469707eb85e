use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use inspection_common::{assemble, FormState, FormValues, InspectionType, ViewContext};
use inspection_form::cli::{Cli, Commands};
use inspection_form::config::Config;
use inspection_form::dashboard::Dashboard;
use inspection_form::error::InspectionError;
use inspection_form::feed::{FileScheduleFeed, HttpScheduleFeed, OfflineFeed, ScheduleFeed};
use inspection_form::interactive::{render_form, run_fill};
use inspection_form::picker::{PathPicker, PromptPicker};
use inspection_form::session::FormSession;
use inspection_form::store::{DirImageStore, JsonRecordStore};
use inspection_form::SubmissionPipeline;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

type LocalPipeline = SubmissionPipeline<DirImageStore, JsonRecordStore>;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// --offline / --feed / 設定の順でフィードを選ぶ
fn build_feed(cli: &Cli, config: &Config) -> anyhow::Result<Box<dyn ScheduleFeed>> {
    if cli.offline {
        return Ok(Box::new(OfflineFeed));
    }
    if let Some(path) = &cli.feed {
        return Ok(Box::new(FileScheduleFeed::new(path)));
    }
    match config.feed_url() {
        Some(url) => Ok(Box::new(HttpScheduleFeed::new(
            url,
            config.feed_auth(),
            config.timeout(),
        )?)),
        None => Ok(Box::new(OfflineFeed)),
    }
}

fn build_pipeline(config: &Config) -> anyhow::Result<LocalPipeline> {
    let data_dir = config.data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;
    Ok(SubmissionPipeline::new(
        DirImageStore::new(data_dir.join("images")),
        JsonRecordStore::in_dir(&data_dir),
    ))
}

async fn load_dashboard(feed: Box<dyn ScheduleFeed>) -> Dashboard<Box<dyn ScheduleFeed>> {
    let mut dashboard = Dashboard::new(feed, chrono::Local::now().date_naive());
    let pb = spinner("Loading schedule...");
    let refreshed = dashboard.refresh().await.is_ok();
    pb.finish_and_clear();
    if !refreshed {
        println!("⚠ スケジュールを取得できませんでした（サンプルを表示）");
    }
    dashboard
}

fn read_form_values(path: &Path) -> anyhow::Result<FormValues> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let values = serde_json::from_str(&content)
        .with_context(|| format!("invalid form JSON: {}", path.display()))?;
    Ok(values)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match &cli.command {
        Commands::Dashboard { date, inspection_type } => {
            let dashboard = load_dashboard(build_feed(&cli, &config)?).await;
            let index = dashboard.index();

            println!("📅 Dashboard\n");
            for day in index.days() {
                let marker = if Some(day.date) == *date { "▶" } else { " " };
                println!("{} {}  {}", marker, day.date, day.count_label());
            }

            let Some(target) = date.or_else(|| index.dates().first().copied()) else {
                return Ok(());
            };
            println!("\n{}", target);
            let inspections = index.inspections_for(target, *inspection_type);
            if inspections.is_empty() {
                println!("  (no inspections)");
            }
            for summary in inspections {
                println!(
                    "  [{}] {:<8} {:<26} {:<18} {}",
                    summary.id,
                    summary.time,
                    summary.heading(),
                    summary.address,
                    summary.status
                );
            }
        }

        Commands::Schedule { id } => {
            let dashboard = load_dashboard(build_feed(&cli, &config)?).await;
            let opened = dashboard
                .open(id)
                .await
                .with_context(|| format!("inspection not found: {}", id))?;

            let state = assemble(opened.remote.as_ref(), &opened.fallback, &opened.ctx);
            println!("📋 {} ({})", opened.summary.heading(), opened.summary.status);
            match &opened.remote_item {
                Some(item) => {
                    let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
                    println!("  Form: {} ({})", show(&item.form_name), show(&item.form_id));
                    println!("  Inspector: {}", show(&item.inspector_name));
                    println!("  Status: {}", show(&item.status));
                    println!("  Comments: {}", show(&item.comments));
                }
                None => println!("  (no remote record)"),
            }
            println!();
            let session = FormSession::new(build_pipeline(&config)?, opened.ctx, state);
            for line in render_form(&session.snapshot()) {
                println!("  {}", line);
            }
        }

        Commands::Fill { inspection_type, record } => {
            let pipeline = build_pipeline(&config)?;
            let session = match record {
                Some(id) => {
                    let dashboard = load_dashboard(build_feed(&cli, &config)?).await;
                    let opened = dashboard
                        .open(id)
                        .await
                        .with_context(|| format!("inspection not found: {}", id))?;
                    FormSession::open(pipeline, opened.remote.as_ref(), &opened.fallback, opened.ctx)
                }
                None => FormSession::new(
                    pipeline,
                    ViewContext::new_inspection(*inspection_type),
                    FormState::default(),
                ),
            }
            .with_notice_delay(config.success_notice_delay());

            run_fill(&session, &PromptPicker).await?;
        }

        Commands::Submit { input, inspection_type, image } => {
            let values = read_form_values(input)?;
            let session = FormSession::new(
                build_pipeline(&config)?,
                ViewContext::new_inspection(*inspection_type),
                FormState::with_values(values, false),
            );
            submit_once(&session, *inspection_type, image.as_deref()).await?;
        }

        Commands::Records => {
            let store = JsonRecordStore::in_dir(&config.data_dir()?);
            let records = store.list().await.map_err(InspectionError::from)?;
            if records.is_empty() {
                println!("保存済みの検査はありません: {}", store.path().display());
            }
            for record in records {
                println!(
                    "  [{}] {} {} {} - {} {}",
                    record.application_id,
                    record.created_at.format("%Y-%m-%d %H:%M"),
                    record.inspection_name,
                    record.status,
                    record.contact.first_name,
                    record.contact.last_name
                );
            }
        }

        Commands::Config { show, set_feed_url, set_auth } => {
            let mut config = config.clone();

            if let Some(url) = set_feed_url {
                config.schedule_url = Some(url.clone());
                config.save()?;
                println!("✔ フィードURLを設定しました");
            }
            if let Some(auth) = set_auth {
                config.auth_header = Some(auth.clone());
                config.save()?;
                println!("✔ Authorization を設定しました");
            }

            if *show {
                println!("設定:");
                println!("  フィードURL: {}", config.feed_url().as_deref().unwrap_or("(オフライン)"));
                println!(
                    "  Authorization: {}",
                    if config.feed_auth().is_some() { "設定済み" } else { "未設定" }
                );
                println!("  保存先: {}", config.data_dir()?.display());
                println!("  完了通知: {}ms", config.success_notice_ms);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
            }
        }
    }

    Ok(())
}

async fn submit_once(
    session: &FormSession<DirImageStore, JsonRecordStore>,
    inspection_type: InspectionType,
    image: Option<&Path>,
) -> anyhow::Result<()> {
    println!("📤 {}\n", inspection_type.name());

    if session.pick_image(&PathPicker::new(image.map(Path::to_path_buf))).await? {
        println!("✔ 写真を選択しました");
    }

    let pb = spinner("Submitting...");
    let result = session.submit().await;
    pb.finish_and_clear();

    let snapshot = session.snapshot();
    match result {
        Ok(record) => {
            if let Some(message) = snapshot.success_message {
                println!("✔ {}", message);
            }
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Err(e) => {
            for line in render_form(&snapshot) {
                println!("  {}", line);
            }
            Err(e.into())
        }
    }
}
