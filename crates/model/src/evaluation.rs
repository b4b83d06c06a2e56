//! Held-out evaluation of a binary classifier.

use ndarray::Array1;
use serde::Serialize;
use std::fmt::Write as _;

/// Confusion matrix for binary classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
}

impl ConfusionMatrix {
    #[must_use]
    pub fn from_predictions(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let mut cm = Self::default();
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            match (t >= 0.5, p >= 0.5) {
                (true, true) => cm.tp += 1,
                (false, false) => cm.tn += 1,
                (false, true) => cm.fp += 1,
                (true, false) => cm.fn_ += 1,
            }
        }
        cm
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    #[must_use]
    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    /// Scores for one class, treating it as the positive class.
    #[must_use]
    pub fn class_scores(&self, class: u8) -> ClassScores {
        let (hit, false_alarm, miss) = if class == 1 {
            (self.tp, self.fp, self.fn_)
        } else {
            (self.tn, self.fn_, self.fp)
        };
        let precision = ratio(hit, hit + false_alarm);
        let recall = ratio(hit, hit + miss);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        ClassScores {
            precision,
            recall,
            f1,
            support: hit + miss,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassScores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class precision/recall/F1/support with accuracy and averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    pub confusion_matrix: ConfusionMatrix,
    /// Scores for class 0 (not profitable) and class 1 (profitable).
    pub classes: [ClassScores; 2],
    pub accuracy: f64,
    pub macro_avg: ClassScores,
    pub weighted_avg: ClassScores,
}

impl ClassificationReport {
    #[must_use]
    pub fn from_predictions(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let cm = ConfusionMatrix::from_predictions(y_true, y_pred);
        let classes = [cm.class_scores(0), cm.class_scores(1)];
        let support = classes[0].support + classes[1].support;

        let macro_avg = ClassScores {
            precision: (classes[0].precision + classes[1].precision) / 2.0,
            recall: (classes[0].recall + classes[1].recall) / 2.0,
            f1: (classes[0].f1 + classes[1].f1) / 2.0,
            support,
        };

        #[allow(clippy::cast_precision_loss)]
        let weighted = |score: fn(&ClassScores) -> f64| {
            if support == 0 {
                return 0.0;
            }
            classes
                .iter()
                .map(|c| score(c) * c.support as f64)
                .sum::<f64>()
                / support as f64
        };
        let weighted_avg = ClassScores {
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1: weighted(|c| c.f1),
            support,
        };

        Self {
            confusion_matrix: cm,
            classes,
            accuracy: cm.accuracy(),
            macro_avg,
            weighted_avg,
        }
    }

    /// Renders a fixed-width table with one line per class and average.
    #[must_use]
    pub fn render(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(
            s,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        );
        s.push('\n');
        for (label, scores) in ["0", "1"].iter().zip(self.classes.iter()) {
            let _ = writeln!(s, "{}", Self::line(label, scores));
        }
        s.push('\n');
        let _ = writeln!(
            s,
            "{:>14} {:>10} {:>10} {:>10.2} {:>10}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        );
        let _ = writeln!(s, "{}", Self::line("macro avg", &self.macro_avg));
        let _ = writeln!(s, "{}", Self::line("weighted avg", &self.weighted_avg));
        s
    }

    fn line(label: &str, scores: &ClassScores) -> String {
        format!(
            "{:>14} {:>10.2} {:>10.2} {:>10.2} {:>10}",
            label, scores.precision, scores.recall, scores.f1, scores.support
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Array1<f64>, Array1<f64>) {
        (
            Array1::from_vec(vec![1.0, 0.0, 1.0, 1.0, 0.0, 0.0]),
            Array1::from_vec(vec![1.0, 0.0, 0.0, 1.0, 1.0, 0.0]),
        )
    }

    #[test]
    fn test_confusion_matrix() {
        let (y_true, y_pred) = sample();
        let cm = ConfusionMatrix::from_predictions(&y_true, &y_pred);
        assert_eq!(cm.tp, 2);
        assert_eq!(cm.tn, 2);
        assert_eq!(cm.fp, 1);
        assert_eq!(cm.fn_, 1);
        assert!((cm.accuracy() - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn per_class_scores_and_averages() {
        let y_true = Array1::from_vec(vec![1.0, 1.0, 1.0, 0.0]);
        let y_pred = Array1::from_vec(vec![1.0, 1.0, 0.0, 0.0]);
        let report = ClassificationReport::from_predictions(&y_true, &y_pred);

        let zero = report.classes[0];
        assert!((zero.precision - 0.5).abs() < 1e-12);
        assert!((zero.recall - 1.0).abs() < 1e-12);
        assert_eq!(zero.support, 1);

        let one = report.classes[1];
        assert!((one.precision - 1.0).abs() < 1e-12);
        assert!((one.recall - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(one.support, 3);

        assert!((report.accuracy - 0.75).abs() < 1e-12);
        assert!((report.macro_avg.recall - (1.0 + 2.0 / 3.0) / 2.0).abs() < 1e-12);
        // Weighted recall equals accuracy for a binary report.
        assert!((report.weighted_avg.recall - 0.75).abs() < 1e-12);
        assert_eq!(report.weighted_avg.support, 4);
    }

    #[test]
    fn absent_class_scores_zero() {
        let y_true = Array1::from_vec(vec![1.0, 1.0]);
        let y_pred = Array1::from_vec(vec![1.0, 1.0]);
        let report = ClassificationReport::from_predictions(&y_true, &y_pred);
        assert_eq!(report.classes[0].support, 0);
        assert_eq!(report.classes[0].f1, 0.0);
        assert!((report.accuracy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn render_lists_classes_and_averages() {
        let (y_true, y_pred) = sample();
        let text = ClassificationReport::from_predictions(&y_true, &y_pred).render();
        assert!(text.contains("precision"));
        assert!(text.contains("accuracy"));
        assert!(text.contains("macro avg"));
        assert!(text.contains("weighted avg"));
        assert_eq!(text.lines().filter(|l| !l.trim().is_empty()).count(), 6);
    }
}
