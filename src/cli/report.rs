//! Plain-text reports for query and highlight results

use crate::service::ProcessReport;
use crate::types::{HighlightOutcome, IngestedList, QueryResult, VideoRecord};

/// Records listed in full before the list is cut
pub const MAX_LISTED_RECORDS: usize = 10;
/// Not-found tokens listed before the rest are summarised
pub const MAX_LISTED_NOT_FOUND: usize = 10;

/// Format a number for display, removing unnecessary decimal places
pub fn format_number(n: f64) -> String {
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// `2 мин 5 сек`, or `45 сек` under a minute
pub fn format_duration(total_seconds: f64) -> String {
    let minutes = (total_seconds / 60.0).floor();
    let seconds = (total_seconds % 60.0).round();
    if minutes > 0.0 {
        format!("{} мин {} сек", minutes, seconds)
    } else {
        format!("{} сек", seconds)
    }
}

fn record_dates(record: &VideoRecord) -> String {
    match (record.start_date.is_empty(), record.end_date.is_empty()) {
        (false, false) => format!("{} - {}", record.start_date, record.end_date),
        (false, true) => record.start_date.clone(),
        (true, false) => record.end_date.clone(),
        (true, true) => "Дата не указана".to_string(),
    }
}

pub fn render_record(record: &VideoRecord) -> String {
    format!(
        "• {} | {} сек | {} | {}",
        record.campaign_name,
        format_number(record.duration),
        record.outlet_type,
        record_dates(record)
    )
}

/// Query result under its filter lines
pub fn render_query(filters: &[String], result: &QueryResult) -> String {
    let mut out = String::from("Фильтры:\n");
    for line in filters {
        out.push_str(&format!("• {}\n", line));
    }
    out.push('\n');

    if result.count == 0 {
        out.push_str("Ролики не найдены по указанным критериям.");
        return out;
    }

    out.push_str(&format!("Найдено роликов: {}\n", result.count));
    out.push_str(&format!(
        "Общая длительность: {} сек ({})\n\n",
        format_number(result.total_duration),
        format_duration(result.total_duration)
    ));

    if result.count <= MAX_LISTED_RECORDS {
        out.push_str("Список роликов:\n");
    } else {
        out.push_str(&format!(
            "Показаны первые {} из {} роликов:\n",
            MAX_LISTED_RECORDS, result.count
        ));
    }
    for record in result.records.iter().take(MAX_LISTED_RECORDS) {
        out.push_str(&render_record(record));
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub fn render_highlight(outcome: &HighlightOutcome) -> String {
    let mut out = format!("Выделено ячеек: {}", outcome.highlighted);
    if !outcome.not_found.is_empty() {
        out.push_str(&format!("\n\nНе найдены ТК ({}):\n", outcome.not_found.len()));
        let shown: Vec<String> = outcome
            .not_found
            .iter()
            .take(MAX_LISTED_NOT_FOUND)
            .map(|token| format!("• {}", token))
            .collect();
        out.push_str(&shown.join("\n"));
        if outcome.not_found.len() > MAX_LISTED_NOT_FOUND {
            out.push_str(&format!(
                "\n... и ещё {}",
                outcome.not_found.len() - MAX_LISTED_NOT_FOUND
            ));
        }
    }
    out
}

pub fn render_ingest(list: &IngestedList) -> String {
    format!(
        "РК: {}\nКоличество уникальных ТК: {}",
        list.campaign_name,
        list.tokens.len()
    )
}

pub fn render_process(report: &ProcessReport) -> String {
    let mut out = render_ingest(&report.list);
    match (&report.row, &report.outcome) {
        (Some(row), Some(outcome)) => {
            out.push_str(&format!("\nРК найдена в строке {}\n\n", row.row_number));
            out.push_str(&render_highlight(outcome));
        }
        _ => {
            out.push_str(&format!(
                "\nРК \"{}\" не найдена в Google Таблице.",
                report.list.campaign_name
            ));
        }
    }
    out
}
