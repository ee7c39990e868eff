use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::round1;

/// Mean of the criteria ratings, rounded to 1 decimal place. None when no
/// criteria were rated, leaving any prior overall rating untouched.
pub fn overall_rating(ratings: &[f64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    Some(round1(ratings.iter().sum::<f64>() / ratings.len() as f64))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RatingPoint {
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub rating: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PerformanceAnalytics {
    pub total_evaluations: usize,
    pub average_rating: f64,
    pub latest_rating: f64,
    pub rating_trend: Vec<RatingPoint>,
    pub strengths: Vec<String>,
    pub areas_of_improvement: Vec<String>,
}

/// One evaluation's contribution to the analytics rollup.
pub struct EvaluationFacts {
    pub review_end_date: NaiveDate,
    pub overall_rating: Option<f64>,
    pub strengths: Vec<String>,
    pub areas_of_improvement: Vec<String>,
}

/// Rolls a set of evaluations into count, mean rating (1 dp), latest rating,
/// a time-ordered trend, and the de-duplicated union of strengths and
/// improvement areas (first occurrence wins). Unrated evaluations contribute
/// 0 to the mean, as the source system did.
pub fn analytics(mut evaluations: Vec<EvaluationFacts>) -> Option<PerformanceAnalytics> {
    if evaluations.is_empty() {
        return None;
    }

    evaluations.sort_by_key(|e| e.review_end_date);

    let total = evaluations.len();
    let sum: f64 = evaluations.iter().map(|e| e.overall_rating.unwrap_or(0.0)).sum();
    let latest = evaluations
        .last()
        .and_then(|e| e.overall_rating)
        .unwrap_or(0.0);

    let rating_trend = evaluations
        .iter()
        .map(|e| RatingPoint {
            date: e.review_end_date,
            rating: e.overall_rating.unwrap_or(0.0),
        })
        .collect();

    let mut strengths: Vec<String> = Vec::new();
    let mut improvements: Vec<String> = Vec::new();
    for e in &evaluations {
        for s in &e.strengths {
            if !strengths.contains(s) {
                strengths.push(s.clone());
            }
        }
        for a in &e.areas_of_improvement {
            if !improvements.contains(a) {
                improvements.push(a.clone());
            }
        }
    }

    Some(PerformanceAnalytics {
        total_evaluations: total,
        average_rating: round1(sum / total as f64),
        latest_rating: latest,
        rating_trend,
        strengths,
        areas_of_improvement: improvements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[test]
    fn mean_rating_rounds_to_one_decimal() {
        assert_eq!(overall_rating(&[4.0, 5.0, 3.0]), Some(4.0));
        assert_eq!(overall_rating(&[4.0, 4.0, 5.0]), Some(4.3));
        assert_eq!(overall_rating(&[]), None);
    }

    #[test]
    fn analytics_orders_trend_and_dedups() {
        let result = analytics(vec![
            EvaluationFacts {
                review_end_date: d(12, 31),
                overall_rating: Some(4.5),
                strengths: vec!["Ownership".to_string(), "Communication".to_string()],
                areas_of_improvement: vec!["Delegation".to_string()],
            },
            EvaluationFacts {
                review_end_date: d(6, 30),
                overall_rating: Some(3.5),
                strengths: vec!["Communication".to_string()],
                areas_of_improvement: vec!["Planning".to_string(), "Delegation".to_string()],
            },
        ])
        .unwrap();

        assert_eq!(result.total_evaluations, 2);
        assert_eq!(result.average_rating, 4.0);
        assert_eq!(result.latest_rating, 4.5);
        assert_eq!(result.rating_trend.len(), 2);
        assert_eq!(result.rating_trend[0].date, d(6, 30));
        assert_eq!(result.rating_trend[1].date, d(12, 31));
        assert_eq!(
            result.strengths,
            vec!["Communication".to_string(), "Ownership".to_string()]
        );
        assert_eq!(
            result.areas_of_improvement,
            vec!["Planning".to_string(), "Delegation".to_string()]
        );
    }

    #[test]
    fn analytics_of_nothing_is_none() {
        assert!(analytics(vec![]).is_none());
    }

    #[test]
    fn unrated_evaluations_count_as_zero() {
        let result = analytics(vec![
            EvaluationFacts {
                review_end_date: d(3, 31),
                overall_rating: None,
                strengths: vec![],
                areas_of_improvement: vec![],
            },
            EvaluationFacts {
                review_end_date: d(9, 30),
                overall_rating: Some(4.0),
                strengths: vec![],
                areas_of_improvement: vec![],
            },
        ])
        .unwrap();
        assert_eq!(result.average_rating, 2.0);
        assert_eq!(result.latest_rating, 4.0);
    }
}
