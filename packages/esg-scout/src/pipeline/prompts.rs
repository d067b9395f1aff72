//! Language model prompts for signal extraction and explanation.

use serde_json::json;

use crate::types::{scores::EsgScores, signals::EsgSignals};

/// System message for signal extraction.
pub const EXTRACT_SYSTEM_PROMPT: &str =
    "You are a precise ESG analyst. Always output valid JSON that matches the requested schema.";

/// Extraction instructions; `{text}` is replaced with the corpus.
pub const EXTRACT_PROMPT: &str = r#"You are an ESG analyst. You will be given text from ESG, sustainability, or impact reports
and related analysis about a single company.

Your job is to extract clear, factual ESG signals and output a STRICT JSON object
with this exact structure and keys:

{
  "E": {
    "has_net_zero_target": true/false,
    "net_zero_year": int or null,
    "uses_renewable_energy": true/false,
    "renewable_share_pct": float or null,
    "discloses_scope_1_2": true/false,
    "discloses_scope_3": true/false
  },
  "S": {
    "has_diversity_policy": true/false,
    "female_leadership_pct": float or null,
    "employee_wellbeing_programs": true/false,
    "workplace_safety_programs": true/false,
    "community_programs": true/false,
    "mentions_diversity_or_inclusion": true/false,
    "mentions_employee_safety_or_health": true/false,
    "mentions_community_or_philanthropy": true/false
  },
  "G": {
    "has_independent_board": true/false,
    "board_independence_pct": float or null,
    "has_anti_corruption_policy": true/false,
    "has_whistleblower_mechanism": true/false,
    "has_esg_governance_structure": true/false,
    "mentions_board_or_directors": true/false,
    "mentions_ethics_or_code_of_conduct": true/false,
    "mentions_compliance_or_risk_management": true/false
  }
}

Interpretation rules:

ENVIRONMENT (E)
- A clear climate or net-zero target sets has_net_zero_target=true.
  "We target net-zero by 2030" -> has_net_zero_target=true, net_zero_year=2030
  "Net-zero emissions by 2050" -> has_net_zero_target=true, net_zero_year=2050
- Years tied to emissions neutrality count even without the phrase "net-zero".
- Material use of renewable or clean energy sets uses_renewable_energy=true; a stated
  renewable percentage goes in renewable_share_pct.
- Disclosed Scope 1 and 2 emissions set discloses_scope_1_2=true; Scope 3 sets discloses_scope_3=true.

SOCIAL (S)
- has_diversity_policy: any formal or informal diversity, equity or inclusion policy,
  program or commitment ("diversity & inclusion", "DEI", "equal opportunities").
- female_leadership_pct: percentage of women in leadership, management or the board.
  Approximate qualitative statements ("about one third" -> 33.0, "around half" -> 50.0).
- employee_wellbeing_programs: structured wellbeing programs, mental health support, wellbeing benefits.
- workplace_safety_programs: workplace safety policies, incident prevention, occupational
  health and safety management systems.
- community_programs: community engagement, philanthropy, social impact programs.
- mentions_diversity_or_inclusion: any mention of diversity, inclusion, equity, equal opportunity.
- mentions_employee_safety_or_health: any mention of worker safety, occupational health, injury reduction.
- mentions_community_or_philanthropy: any mention of communities, charity, donations, volunteering.

GOVERNANCE (G)
- has_independent_board: explicit independent directors or an independent board structure.
- board_independence_pct: percentage of independent directors; approximate qualitative statements.
- has_anti_corruption_policy: anti-corruption, anti-bribery, or ethics policy covering corruption.
- has_whistleblower_mechanism: whistleblower process, hotline, speak-up line or equivalent.
- has_esg_governance_structure: ESG or sustainability committee, board-level ESG oversight.
- mentions_board_or_directors: any discussion of the board, board committees or board oversight.
- mentions_ethics_or_code_of_conduct: ethics, conduct, code of conduct, integrity.
- mentions_compliance_or_risk_management: compliance, risk management frameworks, internal controls.

General rules:
- A clearly indicated positive signal sets the boolean to true; a clear contradiction sets it to false.
- A topic not mentioned at all is false, and its numeric fields are null.
- Use approximate percentages only when the text is clear; otherwise null.

Return ONLY the JSON object, no explanation, no markdown, no extra keys.

Here is the text to analyze (may be long):

"""
{text}
"""
"#;

/// System message for the narrative explanation.
pub const EXPLAIN_SYSTEM_PROMPT: &str =
    "You are an ESG consultant. Explain ESG scores in concise, business-friendly language.";

/// Build the extraction prompt for a corpus.
pub fn extraction_prompt(corpus: &str) -> String {
    EXTRACT_PROMPT.replace("{text}", corpus)
}

/// Build the explanation prompt from the scored data.
pub fn explanation_prompt(root_url: &str, signals: &EsgSignals, scores: &EsgScores) -> String {
    let payload = json!({
        "url": root_url,
        "scores": scores,
        "signals": signals,
    });
    let data = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());

    format!(
        "Using the JSON data below, write:\n\
         1) A 120-word overview of the company's ESG performance.\n\
         2) Three key strengths (bullet points).\n\
         3) Three priority improvement actions (bullet points).\n\n\
         Data:\n{data}"
    )
}
