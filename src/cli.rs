use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use inspection_common::InspectionType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inspect")]
#[command(about = "Inspection schedule and form submission tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// フィードを使わず固定スケジュールのみ
    #[arg(long, global = true)]
    pub offline: bool,

    /// フィードの代わりにJSONファイルを読む
    #[arg(long, global = true)]
    pub feed: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 日付ごとの検査一覧
    Dashboard {
        /// 表示する日付（省略時は最新日）
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// 検査種別で絞り込み (1-6)
        #[arg(short = 't', long = "type")]
        inspection_type: Option<InspectionType>,
    },

    /// 1件の検査を開いて初期フォームを表示
    Schedule {
        /// 検査ID
        #[arg(long)]
        id: String,
    },

    /// 対話的にフォームを入力して提出
    Fill {
        /// 新規検査の種別 (1-6)
        #[arg(short = 't', long = "type", default_value = "1")]
        inspection_type: InspectionType,

        /// 既存の検査IDを開く
        #[arg(long)]
        record: Option<String>,
    },

    /// JSONファイルのフォーム値を提出
    Submit {
        /// フォーム値（camelCaseのJSON）
        #[arg(short, long)]
        input: PathBuf,

        /// 検査種別 (1-6)
        #[arg(short = 't', long = "type", default_value = "1")]
        inspection_type: InspectionType,

        /// 添付する写真
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// 保存済みの検査レコード一覧
    Records,

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// フィードURLを設定
        #[arg(long)]
        set_feed_url: Option<String>,

        /// Authorization ヘッダを設定
        #[arg(long)]
        set_auth: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dashboard() {
        let cli = Cli::try_parse_from(["inspect", "dashboard", "--date", "2026-01-18", "--type", "2"])
            .expect("解析失敗");
        match cli.command {
            Commands::Dashboard { date, inspection_type } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 18));
                assert_eq!(inspection_type, Some(InspectionType::Commercial));
            }
            _ => panic!("dashboard ではない"),
        }
    }

    #[test]
    fn test_parse_submit_defaults() {
        let cli = Cli::try_parse_from(["inspect", "--offline", "submit", "--input", "form.json"])
            .expect("解析失敗");
        assert!(cli.offline);
        match cli.command {
            Commands::Submit { input, inspection_type, image } => {
                assert_eq!(input, PathBuf::from("form.json"));
                assert_eq!(inspection_type, InspectionType::Residential);
                assert!(image.is_none());
            }
            _ => panic!("submit ではない"),
        }
    }

    #[test]
    fn test_reject_unknown_type() {
        assert!(Cli::try_parse_from(["inspect", "fill", "--type", "9"]).is_err());
    }
}
