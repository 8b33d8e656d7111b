// User-facing template and fixed messages for the answer pipeline.

/// Wraps the user's question. `{question}` is replaced verbatim.
pub const QUESTION_TEMPLATE: &str = "Please answer the following as an expert.\n\
    [Question] {question}";

/// Advisory length framing appended to the question template. Not enforced on the output.
pub const LENGTH_CONSTRAINT: &str =
    "Constraints: 300-600 characters, include exactly one justification and one caveat.";

pub const EMPTY_INPUT_MESSAGE: &str = "Input text is empty. Please enter a question.";

pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "OpenAI API key is not configured. Set OPENAI_API_KEY in the secrets file or environment.";

/// Prefix for every service failure; the failure description follows it.
pub const SERVICE_FAILURE_PREFIX: &str = "An error occurred: ";
