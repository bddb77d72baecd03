//! Operation names recorded on interview service spans.
//!
//! One constant per remote operation, used as the `op` field value so logs
//! and exported traces can be grouped by operation regardless of transport.

pub const OP_LIST_INTERVIEWS: &str = "list_interviews";
pub const OP_GET_INTERVIEW: &str = "get_interview";
pub const OP_CREATE_INTERVIEW: &str = "create_interview";
pub const OP_UPDATE_INTERVIEW: &str = "update_interview";
pub const OP_LIST_RESPONSES: &str = "list_responses";
pub const OP_GET_RESPONSE: &str = "get_response";
pub const OP_GET_TRANSCRIPT: &str = "get_transcript";
pub const OP_POST_MESSAGE: &str = "post_message";
pub const OP_CREATE_SESSION: &str = "create_session";

/// Every operation name, in port order.
pub const ALL_OPERATIONS: [&str; 9] = [
    OP_LIST_INTERVIEWS,
    OP_GET_INTERVIEW,
    OP_CREATE_INTERVIEW,
    OP_UPDATE_INTERVIEW,
    OP_LIST_RESPONSES,
    OP_GET_RESPONSE,
    OP_GET_TRANSCRIPT,
    OP_POST_MESSAGE,
    OP_CREATE_SESSION,
];
