//! Prompt construction for the three generation passes

/// Builds the analysis, prediction and synthesis prompts for one turn
///
/// The utterance and the serialized context are embedded literally; the
/// builder does no escaping or truncation.
pub struct PromptBuilder<'a> {
    utterance: &'a str,
    context_json: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder for one turn
    pub fn new(utterance: &'a str, context_json: &'a str) -> Self {
        Self {
            utterance,
            context_json,
        }
    }

    /// Prompt for the analysis pass: utterance plus gathered context
    pub fn analysis(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!("ユーザーの質問: \"{}\"\n\n", self.utterance));
        prompt.push_str("収集した情報:\n");
        prompt.push_str(self.context_json);
        prompt.push_str("\n\n");
        prompt.push_str(ANALYSIS_INSTRUCTIONS);

        prompt
    }

    /// Prompt for the prediction pass
    ///
    /// Sees only the analysis text, never the utterance or the raw context.
    pub fn prediction(analysis: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!("分析結果: {}\n\n", analysis));
        prompt.push_str(PREDICTION_INSTRUCTIONS);

        prompt
    }

    /// Prompt for the synthesis pass: everything gathered so far
    pub fn synthesis(&self, analysis: &str, prediction: &str) -> String {
        let mut prompt = String::new();

        // 1. Question and material
        prompt.push_str(&format!("ユーザーの質問: \"{}\"\n\n", self.utterance));
        prompt.push_str(&format!("情報収集結果: {}\n", self.context_json));
        prompt.push_str(&format!("分析結果: {}\n", analysis));
        prompt.push_str(&format!("予測結果: {}\n\n", prediction));

        // 2. Role and answer layout
        prompt.push_str(SYNTHESIS_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(ANSWER_FORMAT);

        prompt
    }
}

const ANALYSIS_INSTRUCTIONS: &str = "あなたは専門的な分析エージェントです。収集した情報を詳細に分析し、パターンや傾向を見つけてください。
分析結果を簡潔にまとめてください。";

const PREDICTION_INSTRUCTIONS: &str = "この分析結果に基づいて、今後の予測や傾向を予想してください。
特に日本の政府データや地域情報を踏まえた予測をお願いします。";

const SYNTHESIS_INSTRUCTIONS: &str = "あなたは親切なAIアシスタントです。上記の情報を統合して、ユーザーに分かりやすく親切な回答を作成してください。";

const ANSWER_FORMAT: &str = "以下の形式で回答してください:
1. 質問への直接的な回答
2. 収集した政府公式データからの補足情報
3. 今後の予測や提案

日本語で自然な会話調で回答してください。";
