use crate::models::DevProfile;

pub const BATTLE_GUIDELINES: &str = r#"Guidelines:
1. Winning factors: exactly 3 specific reasons why the winner performed better
2. Improvement areas: exactly 3 specific suggestions for the other developer to improve
3. Be specific and actionable
4. Ground every point in the metrics and patterns visible in the profiles
5. Consider:
   - Repository quality and quantity
   - Contribution consistency
   - Community engagement
   - Technical diversity
   - Professional presence
6. Keep each point concise but meaningful"#;

pub const PROFILE_ANALYSIS_PROMPT: &str = r#"# SYSTEM ROLE
You are an expert developer career analyst at a top tech company. Analyze the GitHub profile below and provide detailed career insights.

# OUTPUT SCHEMA
{
  "strengths": ["Example: Strong TypeScript expertise with 50+ repos"],
  "weaknesses": ["Example: Limited testing coverage (<20%)"],
  "skillGaps": ["Example: Kubernetes orchestration"],
  "recommendations": ["Example: Build a full-stack project with Next.js"],
  "salaryRange": { "min": 85000, "max": 150000 }
}

# ANALYSIS REQUIREMENTS
1. Evaluate repository quality, not just quantity
2. Consider industry trends and market demand
3. Focus on practical implementation evidence
4. Identify high-impact improvement opportunities

# RESPONSE RULES
- Return PURE JSON only: no markdown, no comments, no explanatory text
- Each array must have 3-5 specific, detailed items of at least 10 characters
- Salary range must reflect market rates, with min below max
- Use concrete numbers and metrics where possible"#;

/// Everything the narrative generator gets to see about one battle.
#[derive(Debug, Clone)]
pub struct BattleNarrativeRequest {
    pub profile1: DevProfile,
    pub profile2: DevProfile,
    pub winner: String,
    pub loser: String,
}

impl BattleNarrativeRequest {
    pub fn new(profile1: DevProfile, profile2: DevProfile, winner: &str, loser: &str) -> Self {
        Self {
            profile1,
            profile2,
            winner: winner.to_string(),
            loser: loser.to_string(),
        }
    }

    pub fn to_prompt(&self) -> String {
        let mut prompt =
            String::from("Analyze these two GitHub profiles and provide battle insights:\n\n");

        prompt.push_str(&format!("Profile 1: {}\n\n", pretty_json(&self.profile1)));
        prompt.push_str(&format!("Profile 2: {}\n\n", pretty_json(&self.profile2)));

        prompt.push_str(
            "Create a battle analysis in JSON format with the following structure. \
             Return ONLY the raw JSON:\n\n",
        );
        prompt.push_str(
            "{\n  \"winningFactors\": [\"string\", \"string\", \"string\"],\n  \
             \"improvementAreas\": [\"string\", \"string\", \"string\"]\n}\n\n",
        );
        prompt.push_str(&format!(
            "The winner is {} and the other developer is {}.\n\n",
            self.winner, self.loser
        ));
        prompt.push_str(BATTLE_GUIDELINES);
        prompt
    }
}

pub fn profile_analysis_prompt(profile: &DevProfile) -> String {
    format!(
        "{}\n\n# INPUT DATA\n{}\n",
        PROFILE_ANALYSIS_PROMPT,
        pretty_json(profile)
    )
}

fn pretty_json(profile: &DevProfile) -> String {
    // DevProfile is plain data; serialization cannot fail.
    serde_json::to_string_pretty(profile).unwrap_or_else(|_| profile.username.clone())
}
