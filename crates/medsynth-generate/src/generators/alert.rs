use chrono::Duration;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::{Rng, RngCore};

use medsynth_core::{Entity, Severity, SystemAlert};

use crate::catalog::{AlertTargeting, SeverityWeights};
use crate::errors::GenerationError;

use super::{EntityGenerator, GeneratorContext, datetime_between, pick};

const WINDOW_DAYS: i64 = 90;

#[derive(Debug, Default, Clone, Copy)]
pub struct AlertGenerator;

impl EntityGenerator for AlertGenerator {
    type Record = SystemAlert;

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<SystemAlert, GenerationError> {
        let templates = &ctx.catalog.alerts;
        let template = &templates[rng.random_range(0..templates.len())];
        let alert_message = pick(&template.messages, rng).to_string();
        let severity = draw_severity(&template.severity_weights, rng)?;

        let patient_id = ctx
            .foreign
            .pick_fk(Entity::SystemAlerts, Entity::Patients, rng)?;
        let doctor_id = match template.targeting {
            AlertTargeting::PatientOnly => None,
            AlertTargeting::PatientAndDoctor => Some(
                ctx.foreign
                    .pick_fk(Entity::SystemAlerts, Entity::Doctors, rng)?,
            ),
            AlertTargeting::PatientMaybeDoctor => {
                if rng.random_bool(0.5) {
                    Some(
                        ctx.foreign
                            .pick_fk(Entity::SystemAlerts, Entity::Doctors, rng)?,
                    )
                } else {
                    None
                }
            }
        };

        let is_read = rng.random_bool(0.5);
        let now = ctx.clock.now;
        let created_date = datetime_between(now - Duration::days(WINDOW_DAYS), now, rng);

        Ok(SystemAlert {
            alert_id: ctx.record_id,
            patient_id: Some(patient_id),
            doctor_id,
            alert_type: template.alert_type.clone(),
            alert_message,
            severity,
            is_read,
            created_date,
        })
    }

    fn check_inputs(&self, ctx: &GeneratorContext<'_>) -> Result<(), GenerationError> {
        if !ctx.foreign.has_pool(Entity::Patients) {
            return Err(GenerationError::EmptyPool {
                child: Entity::SystemAlerts,
                parent: Entity::Patients,
            });
        }
        if ctx.catalog.alerts_need_doctors() && !ctx.foreign.has_pool(Entity::Doctors) {
            return Err(GenerationError::EmptyPool {
                child: Entity::SystemAlerts,
                parent: Entity::Doctors,
            });
        }
        Ok(())
    }
}

pub fn draw_severity(
    weights: &SeverityWeights,
    rng: &mut dyn RngCore,
) -> Result<Severity, GenerationError> {
    let index = WeightedIndex::new(weights.as_array())
        .map_err(|err| GenerationError::InvalidCatalog(format!("severity weights: {err}")))?;
    Ok(Severity::ALL[index.sample(rng)])
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::catalog::Catalog;
    use crate::foreign::{IdPool, InMemoryForeignContext};
    use crate::generators::test_support::{default_foreign, reference_time};
    use crate::model::{Clock, MedicationConsistency};

    use super::*;

    #[test]
    fn targeting_matches_alert_type() {
        let catalog = Catalog::default();
        let clock = Clock::fixed(reference_time());
        let foreign = default_foreign();
        let ctx = GeneratorContext {
            record_id: 1,
            catalog: &catalog,
            clock: &clock,
            foreign: &foreign,
            medication_consistency: MedicationConsistency::Loose,
        };

        let mut lab_with_doctor = 0;
        let mut lab_total = 0;
        for seed in 0..1_000 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let alert = AlertGenerator.generate(&ctx, &mut rng).expect("alert");
            assert!(alert.patient_id.is_some());
            let template = catalog
                .alerts
                .iter()
                .find(|template| template.alert_type == alert.alert_type)
                .expect("known alert type");
            assert!(template.messages.contains(&alert.alert_message));
            assert!(template.severity_weights.weight(alert.severity) > 0.0);
            match template.targeting {
                AlertTargeting::PatientOnly => assert!(alert.doctor_id.is_none()),
                AlertTargeting::PatientAndDoctor => assert!(alert.doctor_id.is_some()),
                AlertTargeting::PatientMaybeDoctor => {
                    lab_total += 1;
                    if alert.doctor_id.is_some() {
                        lab_with_doctor += 1;
                    }
                }
            }
        }
        assert!(lab_total > 0);
        assert!(lab_with_doctor > 0 && lab_with_doctor < lab_total);
    }

    #[test]
    fn severity_follows_weights() {
        let weights = SeverityWeights {
            low: 0.0,
            medium: 0.0,
            high: 0.1,
            critical: 0.9,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut counts: HashMap<Severity, u32> = HashMap::new();
        for _ in 0..1_000 {
            *counts
                .entry(draw_severity(&weights, &mut rng).expect("severity"))
                .or_default() += 1;
        }
        assert_eq!(counts.get(&Severity::Low), None);
        assert_eq!(counts.get(&Severity::Medium), None);
        assert!(counts[&Severity::Critical] > counts[&Severity::High]);
    }

    #[test]
    fn doctors_required_when_templates_target_them() {
        let catalog = Catalog::default();
        let clock = Clock::fixed(reference_time());
        let foreign =
            InMemoryForeignContext::new().with_pool(Entity::Patients, IdPool::range(1, 10));
        let ctx = GeneratorContext {
            record_id: 1,
            catalog: &catalog,
            clock: &clock,
            foreign: &foreign,
            medication_consistency: MedicationConsistency::Loose,
        };
        assert!(matches!(
            AlertGenerator.check_inputs(&ctx),
            Err(GenerationError::EmptyPool {
                parent: Entity::Doctors,
                ..
            })
        ));
    }
}
