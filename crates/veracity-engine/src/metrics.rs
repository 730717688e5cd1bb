//! Metrics collection for engine operations

/// Counters of engine operations
///
/// Tracks ingested evidence, analyses, fusions, rankings and verifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineMetrics {
    /// Ingest batches recorded
    pub ingest_batches: usize,

    /// Evidence items ingested
    pub evidence_ingested: usize,

    /// Analyses explained
    pub analyses: usize,

    /// Products fused
    pub fusions: usize,

    /// Prioritization passes
    pub prioritizations: usize,

    /// Chain verifications run
    pub verifications: usize,

    /// Chain verifications that found issues
    pub failed_verifications: usize,

    /// Ledger records appended
    pub audit_records: usize,
}

impl EngineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an ingest batch
    pub fn record_ingest(&mut self, items: usize) {
        self.ingest_batches += 1;
        self.evidence_ingested += items;
    }

    /// Record an explained analysis
    pub fn record_analysis(&mut self) {
        self.analyses += 1;
    }

    /// Record a fusion
    pub fn record_fusion(&mut self) {
        self.fusions += 1;
    }

    /// Record a prioritization pass
    pub fn record_prioritization(&mut self) {
        self.prioritizations += 1;
    }

    /// Record a chain verification and its outcome
    pub fn record_verification(&mut self, valid: bool) {
        self.verifications += 1;
        if !valid {
            self.failed_verifications += 1;
        }
    }

    /// Record a ledger append
    pub fn record_audit(&mut self) {
        self.audit_records += 1;
    }

    /// Total operations across every kind
    pub fn total_operations(&self) -> usize {
        self.ingest_batches + self.analyses + self.fusions + self.prioritizations + self.verifications
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Engine Metrics Summary".to_string(),
            "======================".to_string(),
            format!(
                "Ingest batches: {} ({} evidence items)",
                self.ingest_batches, self.evidence_ingested
            ),
            format!("Analyses: {}", self.analyses),
            format!("Fusions: {}", self.fusions),
            format!("Prioritizations: {}", self.prioritizations),
            format!(
                "Verifications: {} ({} failed)",
                self.verifications, self.failed_verifications
            ),
            format!("Audit records: {}", self.audit_records),
        ];

        if self.failed_verifications > 0 {
            lines.push(String::new());
            lines.push(format!(
                "WARNING: {} chain(s) failed verification",
                self.failed_verifications
            ));
        }

        lines.join("\n")
    }
}
