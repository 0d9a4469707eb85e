//! 対話式フォーム入力
//!
//! 端末上でフォームを編集し、写真の選択と提出まで行う。
//! 状態はすべて FormSession が持ち、ここは表示と入力だけを担当する。

use crate::error::{InspectionError, Result};
use crate::picker::ImagePicker;
use crate::session::{FormSession, FormSnapshot};
use crate::store::{ImageStore, RecordStore};
use dialoguer::{Confirm, Input, Select};
use indicatif::ProgressBar;
use inspection_common::{FieldKey, FormError, InspectionRecord};
use std::time::Duration;

/// メニュー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Edit,
    PickImage,
    RemoveImage,
    Submit,
    Reset,
    Quit,
}

impl FormAction {
    const EDITABLE: &'static [FormAction] = &[
        FormAction::Edit,
        FormAction::PickImage,
        FormAction::RemoveImage,
        FormAction::Submit,
        FormAction::Reset,
        FormAction::Quit,
    ];
    const VIEW_ONLY: &'static [FormAction] = &[FormAction::Quit];

    pub fn label(self) -> &'static str {
        match self {
            FormAction::Edit => "Edit a field",
            FormAction::PickImage => "Select photo",
            FormAction::RemoveImage => "Remove photo",
            FormAction::Submit => "Submit",
            FormAction::Reset => "Clear form",
            FormAction::Quit => "Quit",
        }
    }

    /// 閲覧専用なら終了のみ
    pub fn available(read_only: bool) -> &'static [FormAction] {
        if read_only {
            Self::VIEW_ONLY
        } else {
            Self::EDITABLE
        }
    }
}

/// スナップショットを表示用の行にする
pub fn render_form(snapshot: &FormSnapshot) -> Vec<String> {
    let mut lines = Vec::new();
    if snapshot.read_only {
        lines.push("(view only)".to_string());
    }

    for key in FieldKey::ALL {
        let value = match snapshot.values.flag(key) {
            Some(flag) => (if flag { "Yes" } else { "No" }).to_string(),
            None => snapshot.values.text(key).unwrap_or_default().to_string(),
        };
        let marker = if key.is_required() { "*" } else { " " };
        let mut line = format!("{}{:<18} {}", marker, key.label(), value);
        if let Some(error) = snapshot.errors.get(&key) {
            line.push_str(&format!("  ! {}", error));
        }
        lines.push(line);
    }

    if snapshot.has_staged_image {
        lines.push(" Photo              (selected)".to_string());
    }
    if let Some(message) = &snapshot.loading_message {
        lines.push(message.clone());
    }
    if let Some(message) = &snapshot.success_message {
        lines.push(format!("✔ {}", message));
    }
    if let Some(message) = &snapshot.error_message {
        lines.push(format!("✗ {}", message));
    }
    lines
}

/// ブロッキングの dialoguer 呼び出しを別スレッドで実行
async fn prompt<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| InspectionError::Prompt(e.to_string()))?
        .map_err(|e| InspectionError::Prompt(e.to_string()))
}

async fn select_action(read_only: bool) -> Result<FormAction> {
    let actions = FormAction::available(read_only);
    let labels: Vec<&'static str> = actions.iter().map(|a| a.label()).collect();
    let index = prompt(move || {
        Select::new()
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()
    })
    .await?;
    Ok(actions[index])
}

async fn edit_one_field<I: ImageStore, R: RecordStore>(session: &FormSession<I, R>) -> Result<()> {
    let labels: Vec<String> = FieldKey::ALL.iter().map(|k| k.label()).collect();
    let index = prompt(move || Select::new().with_prompt("Field").items(&labels).interact()).await?;
    let key = FieldKey::ALL[index];
    let snapshot = session.snapshot();

    let result = match snapshot.values.flag(key) {
        Some(current) => {
            let label = key.label();
            let flag = prompt(move || Confirm::new().with_prompt(label).default(current).interact())
                .await?;
            session.edit_field(key, flag)
        }
        None => {
            let label = key.label();
            let current = snapshot.values.text(key).unwrap_or_default().to_string();
            let text: String = prompt(move || {
                Input::new()
                    .with_prompt(label)
                    .with_initial_text(current)
                    .allow_empty(true)
                    .interact_text()
            })
            .await?;
            session.edit_field(key, text.trim().to_string())
        }
    };

    report_form_error(result)
}

/// 操作を拒否されても対話は続ける
fn report_form_error<T>(result: std::result::Result<T, FormError>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(FormError::Field(e)) => Err(e.into()),
        Err(e) => {
            println!("✗ {}", e);
            Ok(())
        }
    }
}

async fn submit_with_spinner<I: ImageStore, R: RecordStore>(
    session: &FormSession<I, R>,
) -> std::result::Result<InspectionRecord, FormError> {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut rx = session.subscribe();
    let submit = session.submit();
    tokio::pin!(submit);
    loop {
        tokio::select! {
            result = &mut submit => {
                pb.finish_and_clear();
                return result;
            }
            Ok(()) = rx.changed() => {
                if let Some(message) = rx.borrow_and_update().loading_message.clone() {
                    pb.set_message(message);
                }
            }
        }
    }
}

/// フォームの対話ループ
pub async fn run_fill<I, R, P>(session: &FormSession<I, R>, picker: &P) -> Result<()>
where
    I: ImageStore,
    R: RecordStore,
    P: ImagePicker + ?Sized,
{
    println!("📝 {}\n", session.context().inspection_name);

    loop {
        let snapshot = session.snapshot();
        for line in render_form(&snapshot) {
            println!("  {}", line);
        }
        println!();

        match select_action(snapshot.read_only).await? {
            FormAction::Edit => edit_one_field(session).await?,
            FormAction::PickImage => report_form_error(session.pick_image(picker).await)?,
            FormAction::RemoveImage => report_form_error(session.remove_image())?,
            FormAction::Reset => report_form_error(session.reset())?,
            FormAction::Submit => match submit_with_spinner(session).await {
                Ok(record) => {
                    tracing::info!(application_id = %record.application_id, "submitted from terminal");
                }
                Err(e) => report_form_error::<()>(Err(e))?,
            },
            FormAction::Quit => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_read_only_actions() {
        assert_eq!(FormAction::available(true), &[FormAction::Quit]);
        assert_eq!(FormAction::available(false).len(), 6);
    }

    #[test]
    fn test_render_form_marks_errors() {
        let mut errors = BTreeMap::new();
        errors.insert(FieldKey::FirstName, "FirstName is required".to_string());
        let snapshot = FormSnapshot {
            errors,
            error_message: Some("Please fill in the following required fields: FirstName".into()),
            ..Default::default()
        };

        let lines = render_form(&snapshot);
        assert_eq!(lines.len(), FieldKey::ALL.len() + 1);
        assert!(lines
            .iter()
            .any(|l| l.starts_with("*FirstName") && l.ends_with("! FirstName is required")));
        assert!(lines.iter().any(|l| l.starts_with(" IsGarage") && l.ends_with("No")));
        assert!(lines.last().unwrap().starts_with("✗ Please fill in"));
    }
}
