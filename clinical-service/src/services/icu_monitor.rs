//! Simulated ICU vitals feed.
//!
//! A background task nudges every bed's vitals by a small random delta on
//! each tick, clamps them to physiological bounds, and re-derives the bed
//! status. Readers always get a snapshot of the latest tick.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::metrics::{ICU_BEDS, ICU_TICKS_TOTAL};
use crate::models::{BedStatus, IcuBed, Vitals};

pub const HEART_RATE_BOUNDS: RangeInclusive<u32> = 30..=200;
pub const SYSTOLIC_BOUNDS: RangeInclusive<u32> = 60..=220;
pub const DIASTOLIC_BOUNDS: RangeInclusive<u32> = 30..=130;
pub const SPO2_BOUNDS: RangeInclusive<u32> = 70..=100;
pub const RESPIRATORY_BOUNDS: RangeInclusive<u32> = 6..=45;
pub const TEMPERATURE_BOUNDS: RangeInclusive<f64> = 34.0..=42.0;

/// Status from the worst vital: any critical reading makes the bed
/// critical, otherwise any warning reading makes it a warning.
pub fn derive_status(v: &Vitals) -> BedStatus {
    let critical = v.spo2 < 88
        || v.heart_rate < 45
        || v.heart_rate > 130
        || v.systolic_bp < 85
        || v.systolic_bp > 180
        || v.respiratory_rate < 8
        || v.respiratory_rate > 30
        || v.temperature < 35.0
        || v.temperature > 39.5;
    if critical {
        return BedStatus::Critical;
    }

    let warning = v.spo2 < 94
        || v.heart_rate < 55
        || v.heart_rate > 110
        || v.systolic_bp < 95
        || v.systolic_bp > 160
        || v.diastolic_bp > 100
        || v.respiratory_rate < 10
        || v.respiratory_rate > 24
        || v.temperature < 36.0
        || v.temperature > 38.3;
    if warning {
        BedStatus::Warning
    } else {
        BedStatus::Stable
    }
}

fn drift(value: u32, delta: i64, bounds: &RangeInclusive<u32>) -> u32 {
    let next = (value as i64 + delta).clamp(*bounds.start() as i64, *bounds.end() as i64);
    next as u32
}

fn drift_vitals(v: &Vitals, rng: &mut StdRng) -> Vitals {
    let temperature = (v.temperature + rng.gen_range(-0.2..=0.2))
        .clamp(*TEMPERATURE_BOUNDS.start(), *TEMPERATURE_BOUNDS.end());

    let systolic_bp = drift(v.systolic_bp, rng.gen_range(-4..=4), &SYSTOLIC_BOUNDS);
    // Keep a positive pulse pressure.
    let diastolic_bp = drift(v.diastolic_bp, rng.gen_range(-3..=3), &DIASTOLIC_BOUNDS)
        .min(systolic_bp.saturating_sub(10))
        .max(*DIASTOLIC_BOUNDS.start());

    Vitals {
        heart_rate: drift(v.heart_rate, rng.gen_range(-3..=3), &HEART_RATE_BOUNDS),
        systolic_bp,
        diastolic_bp,
        spo2: drift(v.spo2, rng.gen_range(-1..=1), &SPO2_BOUNDS),
        respiratory_rate: drift(v.respiratory_rate, rng.gen_range(-2..=2), &RESPIRATORY_BOUNDS),
        temperature: (temperature * 10.0).round() / 10.0,
    }
}

struct MonitorState {
    beds: Vec<IcuBed>,
    rng: StdRng,
}

#[derive(Clone)]
pub struct IcuMonitor {
    state: Arc<RwLock<MonitorState>>,
}

impl IcuMonitor {
    /// A fixed seed makes the feed reproducible.
    pub fn new(beds: Vec<IcuBed>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        record_statuses(&beds);

        Self {
            state: Arc::new(RwLock::new(MonitorState { beds, rng })),
        }
    }

    /// Monitor over the built-in ICU ward.
    pub fn seeded(seed: Option<u64>) -> Self {
        Self::new(seed_beds(), seed)
    }

    pub async fn beds(&self) -> Vec<IcuBed> {
        self.state.read().await.beds.clone()
    }

    pub async fn bed(&self, bed_id: &str) -> Option<IcuBed> {
        self.state
            .read()
            .await
            .beds
            .iter()
            .find(|bed| bed.bed_id.eq_ignore_ascii_case(bed_id))
            .cloned()
    }

    /// Advance every bed by one refresh step.
    pub async fn tick(&self) {
        let mut guard = self.state.write().await;
        let MonitorState { beds, rng } = &mut *guard;
        let now = Utc::now();

        for bed in beds.iter_mut() {
            let vitals = drift_vitals(&bed.vitals, rng);
            let status = derive_status(&vitals);
            if status != bed.status {
                debug!(
                    bed_id = %bed.bed_id,
                    from = bed.status.as_str(),
                    to = status.as_str(),
                    "ICU bed status changed"
                );
            }
            bed.vitals = vitals;
            bed.status = status;
            bed.updated_utc = now;
        }

        record_statuses(beds);
        ICU_TICKS_TOTAL.inc();
    }

    /// Run the refresh loop until `shutdown` is cancelled.
    pub fn spawn(&self, interval: Duration, shutdown: CancellationToken) -> JoinHandle<()> {
        let monitor = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; vitals start at their seed values.
            ticker.tick().await;

            info!(interval_ms = interval.as_millis() as u64, "ICU monitor started");
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => monitor.tick().await,
                }
            }
            info!("ICU monitor stopped");
        })
    }
}

fn record_statuses(beds: &[IcuBed]) {
    for status in [BedStatus::Stable, BedStatus::Warning, BedStatus::Critical] {
        let count = beds.iter().filter(|bed| bed.status == status).count();
        ICU_BEDS
            .with_label_values(&[status.as_str()])
            .set(count as i64);
    }
}

fn bed(bed_id: &str, patient_name: &str, diagnosis: &str, vitals: Vitals) -> IcuBed {
    IcuBed {
        bed_id: bed_id.to_string(),
        patient_name: patient_name.to_string(),
        diagnosis: diagnosis.to_string(),
        status: derive_status(&vitals),
        vitals,
        updated_utc: Utc::now(),
    }
}

fn vitals(hr: u32, sys: u32, dia: u32, spo2: u32, rr: u32, temp: f64) -> Vitals {
    Vitals {
        heart_rate: hr,
        systolic_bp: sys,
        diastolic_bp: dia,
        spo2,
        respiratory_rate: rr,
        temperature: temp,
    }
}

fn seed_beds() -> Vec<IcuBed> {
    vec![
        bed("ICU-01", "Ramesh Gupta", "Post-CABG recovery", vitals(82, 124, 78, 97, 16, 36.8)),
        bed("ICU-02", "Fatima Begum", "Severe pneumonia", vitals(104, 138, 86, 92, 24, 38.4)),
        bed("ICU-03", "Suresh Iyer", "Septic shock", vitals(128, 88, 52, 86, 28, 39.2)),
        bed("ICU-04", "Kavita Joshi", "Diabetic ketoacidosis", vitals(96, 112, 70, 96, 22, 37.1)),
        bed("ICU-05", "Harpreet Kaur", "Acute stroke", vitals(74, 168, 96, 95, 18, 37.0)),
        bed("ICU-06", "Vikram Rao", "Polytrauma", vitals(112, 102, 64, 94, 20, 37.6)),
    ]
}
