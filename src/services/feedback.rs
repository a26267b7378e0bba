//! 作答反馈 - 业务能力层
//!
//! 只是占位的启发式：按长度给出评语，置信度在 [0.5, 1.0] 随机取值。

use rand::Rng;

const GOOD_ATTEMPT: &str = "Good attempt!";
const TOO_SHORT: &str = "Answer too short.";

/// 反馈结果
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub message: &'static str,
    pub confidence: f64,
}

/// 反馈服务
pub struct FeedbackService {
    min_chars: usize,
}

impl FeedbackService {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }

    /// 评价一次作答
    pub fn evaluate(&self, answer: &str) -> Feedback {
        self.evaluate_with(answer, &mut rand::thread_rng())
    }

    /// 使用指定随机源评价，便于测试
    pub fn evaluate_with<R: Rng + ?Sized>(&self, answer: &str, rng: &mut R) -> Feedback {
        let message = if answer.chars().count() > self.min_chars {
            GOOD_ATTEMPT
        } else {
            TOO_SHORT
        };

        let raw: f64 = rng.gen_range(0.5..=1.0);
        let confidence = (raw * 100.0).round() / 100.0;

        Feedback {
            message,
            confidence,
        }
    }
}

impl Default for FeedbackService {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_length_threshold() {
        let service = FeedbackService::default();
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(service.evaluate_with("12345", &mut rng).message, TOO_SHORT);
        assert_eq!(service.evaluate_with("123456", &mut rng).message, GOOD_ATTEMPT);
        // 按字符计数而不是字节
        assert_eq!(service.evaluate_with("栈是后进先", &mut rng).message, TOO_SHORT);
    }

    #[test]
    fn test_confidence_range_and_rounding() {
        let service = FeedbackService::default();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let feedback = service.evaluate_with("a long enough answer", &mut rng);
            assert!((0.5..=1.0).contains(&feedback.confidence));
            let scaled = feedback.confidence * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-9);
        }
    }
}
