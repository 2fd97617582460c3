//! Execution of parsed commands against a store.
//!
//! Output goes to the given writer so commands can be tested without a
//! terminal.

use super::{parse_day, parse_month, Command};
use crate::diary::{DiaryEntry, IdGenerator, Role};
use crate::errors::{AppError, AppResult};
use crate::ops::{self, Conversation, EntryDraft, Report, SettingsPatch};
use crate::query;
use crate::store::RecordStore;
use chrono::{DateTime, Datelike, Local, Utc};
use std::io::Write;
use tracing::debug;

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const HISTOGRAM_WIDTH: usize = 20;

/// Runs `command`. `now` is the single clock reading for the invocation.
pub fn run(
    command: &Command,
    store: &RecordStore,
    ids: &IdGenerator,
    now: DateTime<Local>,
    out: &mut impl Write,
) -> AppResult<()> {
    debug!("Running command: {}", command.name());

    match command {
        Command::List { sorted } => {
            let mut entries = store.list_entries();
            if *sorted {
                query::sort_by_date_descending(&mut entries);
            }
            print_summaries(out, &entries)?;
        }

        Command::Show { id } => {
            let entry = store
                .get_entry(id)
                .ok_or_else(|| AppError::NotFound(id.clone()))?;
            print_entry(out, &entry)?;
        }

        Command::New {
            title,
            content,
            tags,
            emotion,
            images,
            date,
        } => {
            let draft = EntryDraft {
                title: title.clone(),
                content: content.clone(),
                tags: tags.clone(),
                emotion: emotion.clone(),
                images: images.clone(),
                date: date.clone(),
            };
            let entry = ops::create_entry(store, ids, &draft, now)?;
            writeln!(out, "{}", entry.id)?;
        }

        Command::Edit {
            id,
            title,
            content,
            tags,
            emotion,
        } => {
            let existing = store
                .get_entry(id)
                .ok_or_else(|| AppError::NotFound(id.clone()))?;

            let mut draft = EntryDraft::from_entry(&existing);
            if let Some(title) = title {
                draft.title = title.clone();
            }
            if let Some(content) = content {
                draft.content = content.clone();
            }
            if !tags.is_empty() {
                draft.tags = tags.clone();
            }
            if let Some(emotion) = emotion {
                draft.emotion = Some(emotion.clone());
            }

            let revised = ops::update_entry(store, id, &draft)?;
            print_entry(out, &revised)?;
        }

        Command::Delete { id } => {
            if !store.try_delete_entry(id)? {
                return Err(AppError::NotFound(id.clone()));
            }
            writeln!(out, "Deleted {}", id)?;
        }

        Command::Search { text, tag } => {
            let entries = store.list_entries();
            let found = query::search(&entries, text.as_deref().unwrap_or(""), tag.as_deref());
            print_summaries(out, found)?;
        }

        Command::Day { date } => {
            let day = parse_day(date)?;
            let entries = store.list_entries();
            print_summaries(out, query::by_date(&entries, day))?;
        }

        Command::Tags => {
            for tag in query::distinct_tags(&store.list_entries()) {
                writeln!(out, "#{}", tag)?;
            }
        }

        Command::Calendar { month } => {
            let (year, month) = match month {
                Some(raw) => parse_month(raw)?,
                None => (now.year(), now.month()),
            };
            print_calendar(out, &store.list_entries(), year, month)?;
        }

        Command::Report => {
            let report = ops::build_report(&store.list_entries(), now);
            print_report(out, &report)?;
        }

        Command::Chat { messages } => {
            let at = now.with_timezone(&Utc);
            let mut conversation = Conversation::with_greeting(ids, at);
            for message in messages {
                conversation.push(ids, Role::User, message.as_str(), at);
            }
            let entry = ops::save_conversation(store, &conversation, ids, now)?;
            print_entry(out, &entry)?;
        }

        Command::Settings {
            nickname,
            character,
            theme_color,
        } => {
            let patch = SettingsPatch {
                nickname: nickname.clone(),
                character_name: character.clone(),
                theme_color: theme_color.clone(),
            };
            let settings = if patch.is_empty() {
                store.get_settings()
            } else {
                ops::update_settings(store, &patch)?
            };
            writeln!(out, "nickname:  {}", settings.nickname)?;
            writeln!(out, "character: {}", settings.character_name)?;
            writeln!(out, "theme:     {}", settings.theme_color)?;
        }

        Command::Login { name } => {
            let session = ops::sign_in(store, name)?;
            writeln!(out, "Signed in as {}", session.name)?;
        }

        Command::Reset => {
            ops::delete_account(store)?;
            writeln!(out, "All diary data erased")?;
        }
    }

    Ok(())
}

fn print_summaries<'a>(
    out: &mut impl Write,
    entries: impl IntoIterator<Item = &'a DiaryEntry>,
) -> AppResult<()> {
    let mut printed = 0;
    for entry in entries {
        let day = entry
            .local_day()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "----------".to_string());
        let tags: Vec<String> = entry.tags.iter().map(|t| format!("#{}", t)).collect();
        writeln!(out, "{}  {}  {}  {}", entry.id, day, entry.title, tags.join(" "))?;
        printed += 1;
    }
    if printed == 0 {
        writeln!(out, "No entries")?;
    }
    Ok(())
}

fn print_entry(out: &mut impl Write, entry: &DiaryEntry) -> AppResult<()> {
    writeln!(out, "{}", entry.title)?;
    writeln!(out, "id:      {}", entry.id)?;
    writeln!(out, "date:    {}", entry.date)?;
    if let Some(emotion) = &entry.emotion {
        writeln!(out, "emotion: {}", emotion)?;
    }
    if !entry.tags.is_empty() {
        let tags: Vec<String> = entry.tags.iter().map(|t| format!("#{}", t)).collect();
        writeln!(out, "tags:    {}", tags.join(" "))?;
    }
    for image in &entry.images {
        writeln!(out, "image:   {}", image)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", entry.content)?;

    if let Some(messages) = &entry.messages {
        writeln!(out)?;
        for message in messages {
            let speaker = match message.role {
                Role::User => "you",
                Role::Buddy => "buddy",
            };
            writeln!(out, "  {:>5}: {}", speaker, message.content)?;
        }
    }
    Ok(())
}

fn print_calendar(out: &mut impl Write, entries: &[DiaryEntry], year: i32, month: u32) -> AppResult<()> {
    let grid = query::month_grid(year, month)
        .ok_or_else(|| AppError::InvalidDate(format!("{}-{:02}", year, month)))?;
    let marked = query::days_with_entries(entries, year, month);

    writeln!(out, "{}-{:02}", year, month)?;
    writeln!(out, "{}", WEEKDAY_LABELS.map(|l| format!("{:>4}", l)).join(""))?;
    for week in grid.chunks(7) {
        let mut line = String::new();
        for day in week {
            if day.month() != month {
                line.push_str("    ");
            } else if marked.contains(&day.day()) {
                line.push_str(&format!("{:>3}*", day.day()));
            } else {
                line.push_str(&format!("{:>3} ", day.day()));
            }
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

fn print_report(out: &mut impl Write, report: &Report) -> AppResult<()> {
    writeln!(out, "Entries:     {}", report.total_entries)?;
    writeln!(out, "Streak:      {} days", report.streak)?;
    writeln!(out, "This month:  {}", report.monthly_count)?;
    writeln!(out, "Tags used:   {}", report.distinct_tag_count)?;

    if !report.top_tags.is_empty() {
        writeln!(out)?;
        writeln!(out, "Top tags")?;
        for (rank, tag) in report.top_tags.iter().enumerate() {
            writeln!(out, "  {}. #{} ({})", rank + 1, tag.tag, tag.count)?;
        }
    }

    if !report.emotions.is_empty() {
        writeln!(out)?;
        writeln!(out, "Emotions")?;
        for share in &report.emotions {
            writeln!(
                out,
                "  {} {} ({}%)",
                share.emotion,
                share.count,
                share.rounded_percentage()
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "By weekday")?;
    for (index, label) in WEEKDAY_LABELS.iter().enumerate() {
        let width = (report.weekdays.ratio(index) * HISTOGRAM_WIDTH as f64).round() as usize;
        writeln!(
            out,
            "  {} {:<w$} {}",
            label,
            "#".repeat(width),
            report.weekdays.counts[index],
            w = HISTOGRAM_WIDTH
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 17, 20, 0, 0).unwrap()
    }

    fn run_to_string(command: Command, store: &RecordStore, ids: &IdGenerator) -> AppResult<String> {
        let mut out = Vec::new();
        run(&command, store, ids, now(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn new_entry(title: &str, tags: &[&str], date: &str) -> Command {
        Command::New {
            title: title.to_string(),
            content: format!("{} body", title),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            emotion: None,
            images: Vec::new(),
            date: Some(date.to_string()),
        }
    }

    #[test]
    fn test_new_then_show() {
        let store = RecordStore::in_memory();
        let ids = IdGenerator::new();

        let id = run_to_string(new_entry("Walk", &["#out"], "2024-01-17T09:00:00"), &store, &ids)
            .unwrap()
            .trim()
            .to_string();
        let shown = run_to_string(Command::Show { id: id.clone() }, &store, &ids).unwrap();

        assert!(shown.starts_with("Walk\n"));
        assert!(shown.contains(&format!("id:      {}", id)));
        assert!(shown.contains("tags:    #out"));
    }

    #[test]
    fn test_show_unknown_is_not_found() {
        let store = RecordStore::in_memory();
        let result = run_to_string(Command::Show { id: "nope".into() }, &store, &IdGenerator::new());

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_delete_unknown_is_not_found() {
        let store = RecordStore::in_memory();
        let result = run_to_string(Command::Delete { id: "nope".into() }, &store, &IdGenerator::new());

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_list_sorted_and_empty() {
        let store = RecordStore::in_memory();
        let ids = IdGenerator::new();
        assert_eq!(run_to_string(Command::List { sorted: false }, &store, &ids).unwrap(), "No entries\n");

        run_to_string(new_entry("Newer", &[], "2024-01-17T09:00:00"), &store, &ids).unwrap();
        run_to_string(new_entry("Older", &[], "2024-01-10T09:00:00"), &store, &ids).unwrap();

        let stored = run_to_string(Command::List { sorted: false }, &store, &ids).unwrap();
        let sorted = run_to_string(Command::List { sorted: true }, &store, &ids).unwrap();
        assert!(stored.find("Older").unwrap() < stored.find("Newer").unwrap());
        assert!(sorted.find("Newer").unwrap() < sorted.find("Older").unwrap());
    }

    #[test]
    fn test_edit_replaces_tags_only_when_given() {
        let store = RecordStore::in_memory();
        let ids = IdGenerator::new();
        let id = run_to_string(new_entry("Walk", &["out"], "2024-01-17T09:00:00"), &store, &ids)
            .unwrap()
            .trim()
            .to_string();

        let edit = Command::Edit {
            id: id.clone(),
            title: Some("Run".to_string()),
            content: None,
            tags: Vec::new(),
            emotion: Some("tired".to_string()),
        };
        run_to_string(edit, &store, &ids).unwrap();

        let entry = store.get_entry(&id).unwrap();
        assert_eq!(entry.title, "Run");
        assert_eq!(entry.content, "Walk body");
        assert_eq!(entry.tags, vec!["out"]);
        assert_eq!(entry.emotion.as_deref(), Some("tired"));
    }

    #[test]
    fn test_calendar_marks_days() {
        let store = RecordStore::in_memory();
        let ids = IdGenerator::new();
        run_to_string(new_entry("Walk", &[], "2024-01-17T09:00:00"), &store, &ids).unwrap();

        let calendar = run_to_string(Command::Calendar { month: None }, &store, &ids).unwrap();

        assert!(calendar.starts_with("2024-01\n"));
        assert!(calendar.contains(" 17*"));
        assert!(!calendar.contains(" 16*"));
    }

    #[test]
    fn test_chat_creates_conversation_entry() {
        let store = RecordStore::in_memory();
        let ids = IdGenerator::new();

        let command = Command::Chat {
            messages: vec!["Baked bread.".to_string(), "It burned.".to_string()],
        };
        run_to_string(command, &store, &ids).unwrap();

        let entries = store.list_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "Baked bread. It burned.");
        assert_eq!(entries[0].messages.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn test_report_shows_streak() {
        let store = RecordStore::in_memory();
        let ids = IdGenerator::new();
        run_to_string(new_entry("a", &["x"], "2024-01-17T09:00:00"), &store, &ids).unwrap();
        run_to_string(new_entry("b", &["x"], "2024-01-16T09:00:00"), &store, &ids).unwrap();

        let report = run_to_string(Command::Report, &store, &ids).unwrap();

        assert!(report.contains("Entries:     2"));
        assert!(report.contains("Streak:      2 days"));
        assert!(report.contains("1. #x (2)"));
    }
}
