//! Practice lab: prompt templates and simulated model responses.
//!
//! Responses are canned text delivered after a short delay. A response is
//! only delivered if the lab has not been cancelled since the ticket was
//! issued, so a dismissed view never receives a stale answer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indoc::indoc;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub prompt: &'static str,
}

pub const TEMPLATES: [PromptTemplate; 3] = [
    PromptTemplate {
        name: "Phân Tích Thị Trường",
        prompt: "Phân tích xu hướng thị trường năng lượng tái tạo cho [loại năng lượng] ở [khu vực], tập trung vào các yếu tố chính sách và cơ hội đầu tư.",
    },
    PromptTemplate {
        name: "Nghiên Cứu Kỹ Thuật",
        prompt: "Đánh giá tính khả thi kỹ thuật của dự án [loại dự án năng lượng] với công suất [công suất], xem xét các yếu tố địa lý, khí hậu và cơ sở hạ tầng.",
    },
    PromptTemplate {
        name: "Mô Hình Tài Chính",
        prompt: "Xây dựng mô hình tài chính cho dự án năng lượng [loại dự án] với vốn đầu tư [số vốn], bao gồm phân tích NPV, IRR và thời gian hoàn vốn.",
    },
];

const RESPONSES: [&str; 2] = [
    indoc! {"
        Dựa trên phân tích prompt của bạn, đây là những điểm chính:
        • Thị trường năng lượng tái tạo đang tăng trưởng mạnh mẽ
        • Các chính sách hỗ trợ từ chính phủ đang thúc đẩy đầu tư
        • Chi phí công nghệ giảm tạo cơ hội sinh lời
        • Nhu cầu năng lượng sạch tăng cao từ doanh nghiệp
        Khuyến nghị: Tập trung vào các dự án quy mô trung bình với công nghệ đã được chứng minh.
    "},
    indoc! {"
        Phân tích kỹ thuật cho thấy:
        • Điều kiện địa lý phù hợp cho dự án
        • Cơ sở hạ tầng hiện tại cần nâng cấp
        • Yêu cầu công nghệ tiên tiến để tối ưu hiệu suất
        • Thời gian triển khai dự kiến 18-24 tháng
        Lưu ý: Cần nghiên cứu thêm về tác động môi trường và xã hội.
    "},
];

/// Look a template up by its display name (case-insensitive) or its
/// 1-based position.
pub fn find_template(key: &str) -> Option<&'static PromptTemplate> {
    let key = key.trim();
    if let Ok(n) = key.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| TEMPLATES.get(i));
    }
    TEMPLATES
        .iter()
        .find(|t| t.name.to_lowercase() == key.to_lowercase())
}

pub fn pick_response<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    RESPONSES.choose(rng).copied().unwrap_or(RESPONSES[0])
}

/// Claim on a pending response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    pub prompt: String,
}

#[derive(Debug, Clone, Default)]
pub struct PracticeLab {
    generation: Arc<AtomicU64>,
}

impl PracticeLab {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for `prompt`. Blank prompts are ignored.
    pub fn submit(&self, prompt: &str) -> Option<Ticket> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return None;
        }
        Some(Ticket {
            generation: self.generation.load(Ordering::Acquire),
            prompt: prompt.to_string(),
        })
    }

    /// Invalidate every outstanding ticket.
    pub fn cancel(&self) {
        let previous = self.generation.fetch_add(1, Ordering::AcqRel);
        debug!(generation = previous + 1, "practice tickets cancelled");
    }

    pub fn is_live(&self, ticket: &Ticket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.generation
    }

    /// Wait `delay`, then return a response unless the ticket was cancelled
    /// in the meantime.
    pub async fn deliver(&self, ticket: Ticket, delay: Duration) -> Option<&'static str> {
        tokio::time::sleep(delay).await;
        if !self.is_live(&ticket) {
            debug!(prompt = %ticket.prompt, "dropping response for cancelled ticket");
            return None;
        }
        Some(pick_response(&mut rand::thread_rng()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn templates_by_name_or_index() {
        assert_eq!(find_template("2").unwrap().name, "Nghiên Cứu Kỹ Thuật");
        assert_eq!(
            find_template("mô hình tài chính").unwrap().name,
            "Mô Hình Tài Chính"
        );
        assert!(find_template("0").is_none());
        assert!(find_template("4").is_none());
        assert!(find_template("unknown").is_none());
    }

    #[test]
    fn responses_come_from_the_canned_set() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            assert!(RESPONSES.contains(&pick_response(&mut rng)));
        }
    }

    #[test]
    fn blank_prompt_gets_no_ticket() {
        let lab = PracticeLab::new();
        assert!(lab.submit("   ").is_none());
        assert_eq!(lab.submit(" hi ").unwrap().prompt, "hi");
    }

    #[tokio::test]
    async fn live_ticket_is_delivered() {
        let lab = PracticeLab::new();
        let ticket = lab.submit("Phân tích").unwrap();
        let response = lab.deliver(ticket, Duration::from_millis(1)).await;
        assert!(response.is_some());
    }

    #[tokio::test]
    async fn cancelled_ticket_delivers_nothing() {
        let lab = PracticeLab::new();
        let ticket = lab.submit("Phân tích").unwrap();
        let view = lab.clone();
        let pending = tokio::spawn(async move { view.deliver(ticket, Duration::from_millis(50)).await });
        lab.cancel();
        assert_eq!(pending.await.unwrap(), None);
    }

    #[test]
    fn new_tickets_after_cancel_are_live() {
        let lab = PracticeLab::new();
        let old = lab.submit("a").unwrap();
        lab.cancel();
        let fresh = lab.submit("b").unwrap();
        assert!(!lab.is_live(&old));
        assert!(lab.is_live(&fresh));
    }
}
