//! Prompt templates for the three user actions. Each assembler is a pure
//! function of its inputs; the only precomputed piece is the cached rulebook
//! summary passed in by the caller.

use crate::search::ReferenceCase;

/// Leading-character budget applied to each example-order text quoted in a
/// verdict prompt, whatever the source document's length.
pub const ORDER_EXAMPLE_BUDGET: usize = 2000;

pub const VERDICT_SYSTEM: &str = "You are a RERA executive in Haryana, and have to take a look at consumer complaint, builder's statement, \
consumer statement and supporting documents (any quotes from other orders, written agreements, project plans). \
On the basis of these things, you need to write an order, or give an adjournment with valid reasons.";

/// Take at most `budget` leading characters, never splitting a code point.
fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn format_reference_cases(cases: &[ReferenceCase]) -> String {
    if cases.is_empty() {
        return "No past case references provided.".to_string();
    }
    cases
        .iter()
        .map(|c| format!("- {} ({}): {}", c.title, c.link, c.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_rule_summary(summary: &[String]) -> String {
    if summary.is_empty() {
        return "No rules found".to_string();
    }
    summary.join("\n")
}

/// Verdict drafting: example order formats, both parties' statements and
/// evidence descriptions, and any reference cases, asking for only the
/// "Order" section.
pub fn verdict_prompt(
    example_format_1: &str,
    example_format_2: &str,
    consumer_statement: &str,
    consumer_evidence: &str,
    builder_statement: &str,
    builder_evidence: &str,
    reference_cases: &[ReferenceCase],
) -> String {
    format!(
        "The following is the standard format used in RERA legal orders:\n\
         \n\
         Example Order Format:\n\
         {example_1}\n\
         {example_2}\n\
         \n\
         Case Analysis:\n\
         - Consumer's Statement: {consumer_statement}\n\
         - Consumer's Evidence: {consumer_evidence}\n\
         \n\
         - Builder's Statement: {builder_statement}\n\
         - Builder's Evidence: {builder_evidence}\n\
         \n\
         - Past Similar Cases:\n{cases}\n\
         \n\
         Refer to the information given above to reach a verdict for the case. Refer to the evidence used and call \
         attention to the reference case when they are provided. Ensure your verdict is drawn from the similar \
         circumstances of the reference case and refer to it correctly, using proper legal language and following the \
         Order Format shown to you above.\n\
         \n\
         Print only the \"Order\" section, in the example order format and ensure that details about the order are included.",
        example_1 = truncate_chars(example_format_1, ORDER_EXAMPLE_BUDGET),
        example_2 = truncate_chars(example_format_2, ORDER_EXAMPLE_BUDGET),
        cases = format_reference_cases(reference_cases),
    )
}

/// General compliance check: rulebook summary plus document text, asking for
/// a tabular issue report.
pub fn compliance_prompt(rule_summary: &[String], document_text: &str) -> String {
    format!(
        "RERA Rules: {rules}\n\
         \n\
         Considering the RERA rules and acts, and general best practice for document verification, \
         identify the potential issues with the following document related to its format, completeness, and compliance \
         with standard legal requirements and create a table summarising it.\n\
         \n\
         Document:\n\
         {document_text}\n\
         \n\
         Present the output in a tabular format with the following columns:\n\
         - Issue Type\n\
         - Brief Explanation\n\
         - Probability of Issue (1-10)",
        rules = format_rule_summary(rule_summary),
    )
}

/// Targeted section analysis: same inputs plus a user-specified focus string.
pub fn analysis_prompt(rule_summary: &[String], document_text: &str, focus: &str) -> String {
    format!(
        "RERA Rules: {rules}\n\
         \n\
         Document:\n\
         {document_text}\n\
         \n\
         Based on the RERA rules above, analyze the document given above based on the following search parameters:\n\
         {focus}\n\
         \n\
         Check for discrepancies, lack of clarity, missing information, etc. Give a very short but detailed report of \
         any issues you find relating specifically to the search parameter.",
        rules = format_rule_summary(rule_summary),
    )
}
