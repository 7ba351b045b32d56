use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::axis::{AxisBuildError, AxisStateBuilder};
use crate::config::ScoringConfig;
use crate::domain::{AxisState, CourseOfAction, ThreatEvent};
use crate::evaluation::{
    decide_verdict, CoaEvaluationResult, CoaEvaluator, MettcReport, MettcValidator, Verdict,
    WeightConfigError,
};
use crate::ingest::DataSource;
use crate::threat::{SharedThreatScorer, ThreatScorer};

/// Errors surfaced by the recommendation service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Weights(#[from] WeightConfigError),
    #[error(transparent)]
    AxisBuild(#[from] AxisBuildError),
    #[error("threat event '{0}' not found")]
    UnknownThreat(String),
}

/// Candidate after scoring and the METT-C gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCoa {
    pub evaluation: CoaEvaluationResult,
    pub mett_c: MettcReport,
    pub verdict: Verdict,
}

/// Ranked candidates for one request, with the axis states they were scored against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub mission_id: Option<String>,
    pub axis_states: Vec<AxisState>,
    /// Score order, with rejected candidates moved to the end.
    pub ranked: Vec<RankedCoa>,
    /// Candidates that could not be placed on any axis state.
    pub omitted: Vec<String>,
    /// Why the recommendation is empty, when it is.
    pub reason: Option<String>,
}

impl Recommendation {
    fn unresolved(mission_id: Option<String>, reason: String) -> Self {
        Self {
            mission_id,
            reason: Some(reason),
            ..Self::default()
        }
    }

    /// Highest-ranked accepted candidate.
    pub fn best(&self) -> Option<&RankedCoa> {
        self.ranked.iter().find(|ranked| ranked.verdict.is_accepted())
    }
}

/// Service composing the axis builder, the evaluator, and the METT-C gate.
pub struct CoaRecommendationService {
    builder: Arc<AxisStateBuilder>,
    evaluator: Arc<CoaEvaluator>,
    mett_c: Arc<MettcValidator>,
}

impl CoaRecommendationService {
    pub fn new(source: Arc<dyn DataSource>, scoring: ScoringConfig) -> Result<Self, ServiceError> {
        let thresholds = scoring.threat.thresholds;
        let scorer = SharedThreatScorer::new(ThreatScorer::new(scoring.threat));
        let builder = AxisStateBuilder::new(source).with_threat_scorer(scorer);
        let evaluator = CoaEvaluator::new(scoring.weights)?.with_threat_thresholds(thresholds);

        Ok(Self::with_components(
            builder,
            evaluator,
            MettcValidator::new(scoring.mett_c_floors),
        ))
    }

    pub fn with_components(
        builder: AxisStateBuilder,
        evaluator: CoaEvaluator,
        mett_c: MettcValidator,
    ) -> Self {
        Self {
            builder: Arc::new(builder),
            evaluator: Arc::new(evaluator),
            mett_c: Arc::new(mett_c),
        }
    }

    pub fn builder(&self) -> &AxisStateBuilder {
        &self.builder
    }

    /// Handle for hot-reloading threat tables; changes apply to the next request.
    pub fn threat_scorer(&self) -> &SharedThreatScorer {
        self.builder.threat_scorer()
    }

    /// Rank `coas` for a mission. Fails only when the battlefield data has no axes.
    pub fn recommend(
        &self,
        mission_id: &str,
        coas: &[CourseOfAction],
    ) -> Result<Recommendation, ServiceError> {
        let axis_states = self.builder.build_axis_states(mission_id)?;
        Ok(self.rank(mission_id.to_string(), axis_states, coas))
    }

    /// Rank `coas` around a single threat event. Unresolvable context yields an empty
    /// recommendation with a reason.
    pub fn recommend_for_threat(
        &self,
        event: &ThreatEvent,
        mission_id: Option<&str>,
        coas: &[CourseOfAction],
    ) -> Recommendation {
        let axis_states = self.builder.build_axis_states_from_threat(event, mission_id);
        let Some(mission_id) = axis_states
            .first()
            .and_then(|state| state.mission_id.clone())
        else {
            return Recommendation::unresolved(
                mission_id.map(str::to_string),
                format!(
                    "no axis or mission could be resolved for threat event '{}'",
                    event.threat_id
                ),
            );
        };
        self.rank(mission_id, axis_states, coas)
    }

    /// Look up a stored threat event by id, then rank around it.
    pub fn recommend_for_stored_threat(
        &self,
        threat_id: &str,
        mission_id: Option<&str>,
        coas: &[CourseOfAction],
    ) -> Result<Recommendation, ServiceError> {
        let event = self
            .builder
            .find_threat_event(threat_id)
            .ok_or_else(|| ServiceError::UnknownThreat(threat_id.to_string()))?;
        Ok(self.recommend_for_threat(&event, mission_id, coas))
    }

    fn rank(
        &self,
        mission_id: String,
        axis_states: Vec<AxisState>,
        coas: &[CourseOfAction],
    ) -> Recommendation {
        let thresholds = self.threat_scorer().snapshot().thresholds();
        let evaluator = self.evaluator.as_ref().clone().with_threat_thresholds(thresholds);
        let results = evaluator.evaluate(&mission_id, &axis_states, coas);

        let omitted: Vec<String> = coas
            .iter()
            .filter(|coa| !results.iter().any(|result| result.coa_id == coa.coa_id))
            .map(|coa| coa.coa_id.clone())
            .collect();

        let (mut ranked, rejected): (Vec<RankedCoa>, Vec<RankedCoa>) = results
            .into_iter()
            .map(|evaluation| {
                let mett_c = self.mett_c.validate_coa(&evaluation);
                let verdict = decide_verdict(&mett_c);
                RankedCoa {
                    evaluation,
                    mett_c,
                    verdict,
                }
            })
            .partition(|ranked| !ranked.verdict.is_rejected());
        for candidate in &rejected {
            warn!(
                coa_id = %candidate.evaluation.coa_id,
                verdict = %candidate.verdict.summary(),
                "candidate rejected by METT-C gate"
            );
        }
        ranked.extend(rejected);

        let reason = if axis_states.is_empty() {
            Some("no axis states could be built".to_string())
        } else if ranked.is_empty() && !coas.is_empty() {
            Some("no candidate could be placed on the resolved axes".to_string())
        } else {
            None
        };

        info!(
            mission_id = %mission_id,
            axes = axis_states.len(),
            ranked = ranked.len(),
            omitted = omitted.len(),
            "recommendation ready"
        );

        Recommendation {
            mission_id: Some(mission_id),
            axis_states,
            ranked,
            omitted,
            reason,
        }
    }
}
