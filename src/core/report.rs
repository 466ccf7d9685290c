use crate::core::progress::compute_progress;
use crate::domain::model::{
    Block, Element, GoalRecord, Page, PageSetup, ReportDocument, Rgb, Template,
};
use chrono::NaiveDate;

pub const A4: PageSetup = PageSetup {
    width_mm: 210.0,
    height_mm: 297.0,
    margin_mm: 20.0,
};

const TITLE_SIZE: f32 = 24.0;
const BODY_SIZE: f32 = 12.0;
const HEADER_HEIGHT: f32 = 12.0;
const HEADER_FILL: Rgb = Rgb(220, 230, 241);
const LINE_HEIGHT: f32 = 7.0;
const ROW_HEIGHT: f32 = 8.0;
const BAR_HEIGHT: f32 = 10.0;

/// 逐頁建立報表，`finish` 後不可再修改
#[derive(Debug)]
pub struct ReportBuilder {
    title: String,
    generated_on: NaiveDate,
    template: Template,
    pages: Vec<Page>,
}

impl ReportBuilder {
    /// 建立時即加入封面
    pub fn new(title: impl Into<String>, generated_on: NaiveDate, template: Template) -> Self {
        let title = title.into();
        let cover = cover_page(&title, generated_on);
        Self {
            title,
            generated_on,
            template,
            pages: vec![cover],
        }
    }

    pub fn push_goal(&mut self, record: &GoalRecord) -> &mut Self {
        self.pages.push(goal_page(record));
        self
    }

    pub fn finish(self) -> ReportDocument {
        ReportDocument::new(
            self.title,
            self.generated_on,
            self.template,
            A4,
            self.pages,
        )
    }

    /// 封面加上每筆記錄一頁，順序與輸入相同
    pub fn build(
        title: impl Into<String>,
        generated_on: NaiveDate,
        template: Template,
        records: &[GoalRecord],
    ) -> ReportDocument {
        let mut builder = Self::new(title, generated_on, template);
        for record in records {
            builder.push_goal(record);
        }
        builder.finish()
    }
}

fn block(element: Element, spacing_after: f32) -> Block {
    Block {
        element,
        spacing_after,
    }
}

fn cover_page(title: &str, generated_on: NaiveDate) -> Page {
    Page {
        blocks: vec![
            block(
                Element::Title {
                    text: title.to_string(),
                    size: TITLE_SIZE,
                },
                10.0,
            ),
            block(
                Element::Text {
                    text: format!("Generated on: {}", generated_on.format("%Y-%m-%d")),
                    size: BODY_SIZE,
                },
                0.0,
            ),
        ],
    }
}

fn goal_page(record: &GoalRecord) -> Page {
    let progress = compute_progress(record);

    Page {
        blocks: vec![
            block(
                Element::HeaderCell {
                    text: format!("Goal {}", record.goal_number),
                    height: HEADER_HEIGHT,
                    fill: HEADER_FILL,
                },
                8.0,
            ),
            block(
                Element::Paragraph {
                    text: record.indicator.clone(),
                    size: BODY_SIZE,
                    line_height: LINE_HEIGHT,
                },
                6.0,
            ),
            block(
                Element::LabelValue {
                    label: "Target Value:".to_string(),
                    value: record.target_value.to_string(),
                    height: ROW_HEIGHT,
                },
                2.0,
            ),
            block(
                Element::LabelValue {
                    label: "Current Value:".to_string(),
                    value: record.current_value.to_string(),
                    height: ROW_HEIGHT,
                },
                2.0,
            ),
            block(
                Element::LabelValue {
                    label: "Progress Status:".to_string(),
                    value: record.progress_status.clone(),
                    height: ROW_HEIGHT,
                },
                6.0,
            ),
            block(
                Element::ProgressBar {
                    fraction: progress.bar_fraction(),
                    label: format!("{:.1}%", progress.percent),
                    height: BAR_HEIGHT,
                    fill: progress.band.color(),
                },
                0.0,
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Band;

    fn record(n: usize, target: f64, current: f64) -> GoalRecord {
        GoalRecord {
            goal_number: n.to_string(),
            indicator: format!("Indicator {}", n),
            target_value: target,
            current_value: current,
            progress_status: "On Track".to_string(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_page_count_is_cover_plus_records() {
        for n in [0usize, 1, 5] {
            let records: Vec<GoalRecord> = (1..=n).map(|i| record(i, 100.0, 10.0)).collect();
            let doc = ReportBuilder::build("Report", date(), Template::Basic, &records);
            assert_eq!(doc.page_count(), 1 + n);
        }
    }

    #[test]
    fn test_cover_has_title_and_date_only() {
        let doc = ReportBuilder::build("Goal Progress", date(), Template::Basic, &[]);
        let cover = &doc.pages()[0];
        assert_eq!(cover.blocks.len(), 2);
        assert_eq!(
            cover.blocks[0].element,
            Element::Title {
                text: "Goal Progress".to_string(),
                size: TITLE_SIZE
            }
        );
        match &cover.blocks[1].element {
            Element::Text { text, .. } => assert_eq!(text, "Generated on: 2024-03-01"),
            other => panic!("unexpected element: {:?}", other),
        }
    }

    #[test]
    fn test_goal_pages_keep_input_order() {
        let records = vec![record(3, 1.0, 1.0), record(1, 1.0, 1.0), record(2, 1.0, 1.0)];
        let doc = ReportBuilder::build("Report", date(), Template::Detailed, &records);

        let headers: Vec<String> = doc.pages()[1..]
            .iter()
            .map(|page| match &page.blocks[0].element {
                Element::HeaderCell { text, .. } => text.clone(),
                other => panic!("unexpected element: {:?}", other),
            })
            .collect();
        assert_eq!(headers, vec!["Goal 3", "Goal 1", "Goal 2"]);
    }

    #[test]
    fn test_goal_page_progress_bar() {
        let doc = ReportBuilder::build("Report", date(), Template::Basic, &[record(1, 100.0, 50.0)]);
        let page = &doc.pages()[1];
        assert_eq!(page.blocks.len(), 6);

        match &page.blocks[5].element {
            Element::ProgressBar {
                fraction,
                label,
                fill,
                ..
            } => {
                assert_eq!(*fraction, 0.5);
                assert_eq!(label, "50.0%");
                assert_eq!(*fill, Band::Medium.color());
            }
            other => panic!("unexpected element: {:?}", other),
        }
    }

    #[test]
    fn test_values_rendered_without_trailing_zero() {
        let doc = ReportBuilder::build("Report", date(), Template::Basic, &[record(1, 100.0, 12.5)]);
        let values: Vec<&str> = doc.pages()[1]
            .blocks
            .iter()
            .filter_map(|b| match &b.element {
                Element::LabelValue { value, .. } => Some(value.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(values, vec!["100", "12.5", "On Track"]);
    }

    #[test]
    fn test_negative_progress_keeps_label() {
        let doc = ReportBuilder::build("Report", date(), Template::Basic, &[record(1, 100.0, -10.0)]);
        match &doc.pages()[1].blocks[5].element {
            Element::ProgressBar { fraction, label, .. } => {
                assert_eq!(*fraction, 0.0);
                assert_eq!(label, "-10.0%");
            }
            other => panic!("unexpected element: {:?}", other),
        }
    }
}
