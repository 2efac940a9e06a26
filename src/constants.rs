/// Minibatch field names used in precondition errors and logs.
pub mod fields {
    /// Positive (and, under the independent format, combined) node pairs.
    pub const NODE_PAIR: &str = "node_pair";
    /// Positive/negative labels written by the independent format.
    pub const LABEL: &str = "label";
    /// Reshaped negative heads written by conditioned formats.
    pub const NEGATIVE_HEAD: &str = "negative_head";
    /// Reshaped negative tails written by conditioned formats.
    pub const NEGATIVE_TAIL: &str = "negative_tail";
}

/// Constants used by output-format parsing.
pub mod formats {
    /// Tag for the labeled concatenation format.
    pub const TAG_INDEPENDENT: &str = "independent";
    /// Tag for the head-and-tail conditioned format.
    pub const TAG_CONDITIONED: &str = "conditioned";
    /// Tag for the head-only conditioned format.
    pub const TAG_HEAD_CONDITIONED: &str = "head_conditioned";
    /// Tag for the tail-only conditioned format.
    pub const TAG_TAIL_CONDITIONED: &str = "tail_conditioned";
}

/// Constants used by sampler construction and labeling.
pub mod sampler {
    use crate::types::Label;

    /// Negative ratio used by `NegativeSamplerConfig::default`.
    pub const DEFAULT_NEGATIVE_RATIO: usize = 1;
    /// Label assigned to positive edges.
    pub const POSITIVE_LABEL: Label = 1;
    /// Label assigned to generated negative edges.
    pub const NEGATIVE_LABEL: Label = 0;
    /// Strategy name reported by generators that do not override `name`.
    pub const UNNAMED_STRATEGY: &str = "unnamed";
    /// Placeholder used in logs for the implicit relation of homogeneous batches.
    pub const HOMOGENEOUS_RELATION_LABEL: &str = "<homogeneous>";
}

/// Constants used by the uniform negative generator.
pub mod uniform {
    /// Strategy name reported by `UniformNegativeGenerator`.
    pub const STRATEGY_NAME: &str = "uniform";
}

/// Constants used by sampler test fixtures.
#[cfg(test)]
pub mod sampler_tests {
    /// First relation id used by heterogeneous unit tests.
    pub const RELATION_A: &str = "user:follows:user";
    /// Second relation id used by heterogeneous unit tests.
    pub const RELATION_B: &str = "user:buys:item";
    /// Seed used by uniform generator unit tests.
    pub const TEST_SEED: u64 = 0x5EED_0042;
}
