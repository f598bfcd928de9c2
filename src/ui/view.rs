//! Screen markup
//!
//! Each screen is rendered as an HTML string into `#app`. Buttons carry a
//! `data-action` (and `data-value` for answers) that the click handler
//! dispatches on.

use std::fmt::Write;

use super::effects::Effects;
use crate::persistence::KeyValueStore;
use crate::settings::{QualityPreset, Settings};
use crate::survey::{Achievement, Phase, Progress, Question, QuestionKind, Survey};

/// Seconds after which the speed bonus is gone
const SPEED_HINT_SECS: u64 = 10;

/// Minimal HTML escaping for text and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Elapsed-time hint under the question
pub fn timer_hint(elapsed_ms: f64) -> String {
    let secs = (elapsed_ms.max(0.0) / 1000.0).floor() as u64;
    if secs < SPEED_HINT_SECS {
        format!("{}s · answer now for a speed bonus!", secs)
    } else {
        format!("{}s", secs)
    }
}

/// Score badge, XP bar, settings controls and toast
pub fn hud(progress: &Progress, effects: &Effects, settings: &Settings) -> String {
    let mut html = String::new();
    let pulse = if effects.pulse_active() { " pulse" } else { "" };
    let _ = write!(
        html,
        r#"<div id="score-badge" class="score-badge{pulse}"><span class="pts">⭐ {} pts</span><span class="badges">{} badges</span></div>"#,
        progress.score,
        progress.achievements.len()
    );
    let _ = write!(
        html,
        r#"<div class="xp"><div class="xp-label">XP {}</div><div class="xp-track"><div class="xp-fill" style="width:{}%"></div></div></div>"#,
        progress.experience,
        progress.xp_bar_percent()
    );
    html.push_str(&settings_bar(settings));
    if let Some(toast) = effects.current_toast() {
        let _ = write!(
            html,
            r#"<div class="toast"><div class="toast-icon">✓</div><div><div class="toast-title">{}</div><div class="toast-sub">New achievement unlocked</div></div></div>"#,
            escape(&toast.title)
        );
    }
    html
}

/// Background quality buttons and the motion toggle
pub fn settings_bar(settings: &Settings) -> String {
    let mut html = String::from(r#"<div class="settings">"#);
    for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
        let active = if preset == settings.quality { " active" } else { "" };
        let _ = write!(
            html,
            r#"<button class="quality{active}" data-action="quality" data-value="{0}">{0}</button>"#,
            preset.as_str()
        );
    }
    let _ = write!(
        html,
        r#"<button class="motion" data-action="motion">Motion: {}</button></div>"#,
        if settings.reduced_motion { "off" } else { "on" }
    );
    html
}

/// The screen for the survey's current phase
pub fn screen<S: KeyValueStore>(survey: &Survey<S>, effects: &Effects, now_ms: f64) -> String {
    match survey.phase() {
        Phase::Welcome => welcome(survey.progress(), survey.questions().len()),
        Phase::InProgress { index } => match survey.current_question() {
            Some(question) => question_card(
                question,
                index,
                survey.questions().len(),
                survey.progress_percent().unwrap_or(0),
                survey.session().answer_for(question.id),
                &timer_hint(survey.session().elapsed_ms(now_ms)),
            ),
            None => String::new(),
        },
        Phase::Completed => complete(survey.progress(), effects.confetti_active()),
        Phase::Reviewing => responses(survey),
    }
}

fn badge_list(progress: &Progress) -> String {
    if progress.achievements.is_empty() {
        return r#"<div class="no-badges">No badges yet - keep going!</div>"#.to_string();
    }
    let mut html = String::from(r#"<div class="badge-list">"#);
    for id in &progress.achievements {
        let _ = write!(
            html,
            r#"<span class="badge badge-{}">{}</span>"#,
            escape(id),
            escape(Achievement::display_name(id))
        );
    }
    html.push_str("</div>");
    html
}

pub fn welcome(progress: &Progress, question_count: usize) -> String {
    format!(
        r#"<section class="card welcome"><h1>Share your feedback</h1><p>{} quick questions. Answer within 10 seconds for bonus points.</p><p class="totals">{} pts · {} XP</p>{}<button data-action="start">Start Survey</button></section>"#,
        question_count,
        progress.score,
        progress.experience,
        badge_list(progress)
    )
}

pub fn question_card(
    question: &Question,
    index: usize,
    total: usize,
    percent: u32,
    previous: Option<&str>,
    hint: &str,
) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<section class="card question"><div class="progress-head"><span>Question {} of {}</span><span>{}%</span></div><div class="progress-track"><div class="progress-fill" style="width:{}%"></div></div><div class="progress-dots">"#,
        index + 1,
        total,
        percent,
        percent
    );
    for i in 0..total {
        let class = match i.cmp(&index) {
            std::cmp::Ordering::Less => "dot done",
            std::cmp::Ordering::Equal => "dot current",
            std::cmp::Ordering::Greater => "dot",
        };
        let _ = write!(html, r#"<span class="{class}"></span>"#);
    }
    let _ = write!(
        html,
        r#"</div><div class="timer">{}</div><h2>{}</h2>"#,
        escape(hint),
        escape(&question.text)
    );

    match &question.kind {
        QuestionKind::MultipleChoice => {
            html.push_str(r#"<div class="options">"#);
            for (i, option) in question.options.iter().enumerate() {
                let selected = if previous == Some(option.as_str()) { " selected" } else { "" };
                let _ = write!(
                    html,
                    r#"<button class="option{selected}" data-action="answer" data-value="{}"><span class="letter">{}</span><span>{}</span></button>"#,
                    escape(option),
                    Question::option_letter(i),
                    escape(option)
                );
            }
            html.push_str("</div>");
        }
        QuestionKind::Rating => {
            html.push_str(r#"<div class="stars">"#);
            for star in 1..=question.star_count() {
                let _ = write!(
                    html,
                    r#"<button class="star" data-action="answer" data-value="{star}">{star}★</button>"#
                );
            }
            html.push_str("</div>");
        }
        QuestionKind::Text | QuestionKind::Other(_) => {
            let _ = write!(
                html,
                r#"<textarea id="text-answer" rows="5" placeholder="{}">{}</textarea><button data-action="submit-text">Submit</button>"#,
                escape(question.placeholder.as_deref().unwrap_or("")),
                escape(previous.unwrap_or(""))
            );
        }
    }

    let _ = write!(
        html,
        r#"<div class="nav"><button data-action="prev"{}>Previous</button><button data-action="next"{}>Next</button></div></section>"#,
        if index == 0 { " disabled" } else { "" },
        if index + 1 >= total { " disabled" } else { "" }
    );
    html
}

pub fn complete(progress: &Progress, confetti: bool) -> String {
    format!(
        r#"<section class="card complete{}"><div class="check">✓</div><h2>Survey Complete!</h2><p>Thank you for your feedback. You have <strong>{}</strong> points and <strong>{}</strong> XP.</p><h4>Achievements</h4>{}<div class="actions"><button data-action="view">View Responses</button><button data-action="restart">Take Survey Again</button></div></section>"#,
        if confetti { " confetti" } else { "" },
        progress.score,
        progress.experience,
        badge_list(progress)
    )
}

pub fn responses<S: KeyValueStore>(survey: &Survey<S>) -> String {
    let mut html = String::from(
        r#"<section class="card responses"><div class="head"><h2>Your Survey Responses</h2><button data-action="back">Back</button></div>"#,
    );
    for (question, answer) in survey.responses() {
        let _ = write!(
            html,
            r#"<div class="response"><div class="meta"><span class="qid">{}</span><span class="kind">{}</span></div><h3>{}</h3><p class="answer">{}</p></div>"#,
            question.id,
            question.kind.label(),
            escape(&question.text),
            escape(answer.unwrap_or("No answer provided"))
        );
    }
    html.push_str(r#"<button data-action="restart">Start New Survey</button></section>"#);
    html
}
