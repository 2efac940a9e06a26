/// Graph node identifier as carried in node-pair sequences.
/// Examples: `0`, `42`, `1_048_575`
pub type NodeId = i64;
/// Canonical edge-type identifier keying heterogeneous batches.
/// Examples: `user:follows:user`, `user:buys:item`
pub type RelationId = String;
/// Positive/negative edge label emitted under the independent format.
/// Values: `1` (positive), `0` (negative)
pub type Label = u8;
/// Name reported by a negative generator in logs and errors.
/// Examples: `uniform`, `degree_weighted`
pub type StrategyName = String;
