//! Fixed categorical buckets for heatmaps and time-of-day breakdowns.

use serde::Serialize;

use crate::time::ClockTime;

// ============================================
// Bedtime buckets
// ============================================

/// Display labels for the bedtime heatmap, 8 PM through 2 AM.
pub const BEDTIME_LABELS: [&str; 7] = ["8 PM", "9 PM", "10 PM", "11 PM", "12 AM", "1 AM", "2 AM"];

/// Map a lights-out time to its bedtime bucket.
///
/// Hours 20-23 map to buckets 0-3 and hours 0-2 to buckets 4-6. Any other
/// hour falls outside the heatmap and yields `None`.
pub fn bedtime_bucket(lights_out: ClockTime) -> Option<usize> {
    let hour = lights_out.hour() as usize;
    let index = if hour >= 20 {
        hour - 20
    } else if hour <= 2 {
        hour + 4
    } else {
        return None;
    };
    (index < BEDTIME_LABELS.len()).then_some(index)
}

/// Average quality rating band, used for heatmap colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityRating {
    Poor,
    Fair,
    Good,
    Great,
}

impl QualityRating {
    /// Band for an average subjective quality (1-10 scale).
    pub fn from_average(avg: f64) -> Self {
        if avg >= 8.0 {
            QualityRating::Great
        } else if avg >= 6.0 {
            QualityRating::Good
        } else if avg >= 5.0 {
            QualityRating::Fair
        } else {
            QualityRating::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityRating::Poor => "Poor",
            QualityRating::Fair => "Fair",
            QualityRating::Good => "Good",
            QualityRating::Great => "Great",
        }
    }
}

/// One row of the bedtime-vs-quality heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BedtimeBucket {
    pub label: &'static str,
    /// Number of nights in this bucket
    pub count: usize,
    /// Mean subjective quality; `None` renders as "no data"
    pub average_quality: Option<f64>,
}

impl BedtimeBucket {
    pub fn rating(&self) -> Option<QualityRating> {
        self.average_quality.map(QualityRating::from_average)
    }
}

/// Group `(lights_out, quality)` points into the seven bedtime buckets.
///
/// Always returns seven buckets in label order. Points outside the 8 PM-2 AM
/// window are dropped.
pub fn bedtime_heatmap<I>(points: I) -> Vec<BedtimeBucket>
where
    I: IntoIterator<Item = (ClockTime, f64)>,
{
    let mut sums = [0.0f64; BEDTIME_LABELS.len()];
    let mut counts = [0usize; BEDTIME_LABELS.len()];

    for (lights_out, quality) in points {
        if let Some(index) = bedtime_bucket(lights_out) {
            sums[index] += quality;
            counts[index] += 1;
        }
    }

    BEDTIME_LABELS
        .iter()
        .enumerate()
        .map(|(i, &label)| BedtimeBucket {
            label,
            count: counts[i],
            average_quality: (counts[i] > 0).then(|| sums[i] / counts[i] as f64),
        })
        .collect()
}

// ============================================
// Hourly blocks
// ============================================

/// Contiguous six-hour blocks of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayBlock {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl DayBlock {
    /// All blocks in clock order starting at midnight.
    pub const ALL: [DayBlock; 4] = [
        DayBlock::Night,
        DayBlock::Morning,
        DayBlock::Afternoon,
        DayBlock::Evening,
    ];

    /// Hours covered, as a half-open range.
    pub fn hours(&self) -> std::ops::Range<usize> {
        match self {
            DayBlock::Night => 0..6,
            DayBlock::Morning => 6..12,
            DayBlock::Afternoon => 12..18,
            DayBlock::Evening => 18..24,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayBlock::Night => "Night",
            DayBlock::Morning => "Morning",
            DayBlock::Afternoon => "Afternoon",
            DayBlock::Evening => "Evening",
        }
    }

    pub fn range_label(&self) -> &'static str {
        match self {
            DayBlock::Night => "12am-6am",
            DayBlock::Morning => "6am-12pm",
            DayBlock::Afternoon => "12pm-6pm",
            DayBlock::Evening => "6pm-12am",
        }
    }
}

/// A block's summed volume and share of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockShare {
    pub block: DayBlock,
    pub total: i64,
    /// Percentage of the grand total (0 when nothing was logged)
    pub percentage: f64,
}

/// Sum hourly totals into the four day blocks.
pub fn hourly_blocks(hourly_totals: &[i64; 24]) -> [BlockShare; 4] {
    let grand_total: i64 = hourly_totals.iter().sum();

    DayBlock::ALL.map(|block| {
        let total: i64 = hourly_totals[block.hours()].iter().sum();
        let percentage = if grand_total > 0 {
            total as f64 / grand_total as f64 * 100.0
        } else {
            0.0
        };
        BlockShare {
            block,
            total,
            percentage,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse(s).unwrap()
    }

    #[test]
    fn test_bedtime_bucket_mapping() {
        assert_eq!(bedtime_bucket(t("20:00")), Some(0));
        assert_eq!(bedtime_bucket(t("23:59")), Some(3));
        assert_eq!(bedtime_bucket(t("00:10")), Some(4));
        assert_eq!(bedtime_bucket(t("02:45")), Some(6));
        assert_eq!(bedtime_bucket(t("03:00")), None);
        assert_eq!(bedtime_bucket(t("15:30")), None);
        assert_eq!(bedtime_bucket(t("19:59")), None);
    }

    #[test]
    fn test_out_of_window_bedtime_is_dropped() {
        let buckets = bedtime_heatmap(vec![(t("15:30"), 2.0), (t("22:10"), 8.0), (t("22:50"), 6.0)]);
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[2].label, "10 PM");
        assert_eq!(buckets[2].count, 2);
        assert_eq!(buckets[2].average_quality, Some(7.0));
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!(buckets
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 2)
            .all(|(_, b)| b.average_quality.is_none()));
    }

    #[test]
    fn test_empty_bucket_is_no_data() {
        let buckets = bedtime_heatmap(Vec::new());
        assert!(buckets.iter().all(|b| b.average_quality.is_none() && b.rating().is_none()));
    }

    #[test]
    fn test_quality_rating_bands() {
        assert_eq!(QualityRating::from_average(9.0), QualityRating::Great);
        assert_eq!(QualityRating::from_average(8.0), QualityRating::Great);
        assert_eq!(QualityRating::from_average(6.5), QualityRating::Good);
        assert_eq!(QualityRating::from_average(5.0), QualityRating::Fair);
        assert_eq!(QualityRating::from_average(3.0), QualityRating::Poor);
    }

    #[test]
    fn test_hourly_blocks() {
        let mut totals = [0i64; 24];
        totals[7] = 500;
        totals[13] = 250;
        totals[20] = 250;
        let blocks = hourly_blocks(&totals);
        assert_eq!(blocks[0].block, DayBlock::Night);
        assert_eq!(blocks[0].percentage, 0.0);
        assert_eq!(blocks[1].total, 500);
        assert_eq!(blocks[1].percentage, 50.0);
        assert_eq!(blocks[2].percentage, 25.0);
        assert_eq!(blocks[3].percentage, 25.0);
    }

    #[test]
    fn test_hourly_blocks_empty() {
        let blocks = hourly_blocks(&[0; 24]);
        assert!(blocks.iter().all(|b| b.total == 0 && b.percentage == 0.0));
    }
}
