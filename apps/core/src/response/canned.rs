//! Rule-based replies that never reach a provider.

/// Canned replies personalised with the assistant's name.
#[derive(Debug, Clone)]
pub struct CannedReplies {
    name: String,
}

impl CannedReplies {
    pub fn new(assistant_name: impl Into<String>) -> Self {
        Self {
            name: assistant_name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn greeting(&self) -> String {
        format!(
            "Hello! I'm {}, your AI assistant. I can answer questions, solve math problems, \
             help with writing and just chat.\n\nType /help to see everything I can do.",
            self.name
        )
    }

    pub fn identity(&self) -> String {
        format!(
            "I'm {}, an AI assistant. I answer simple things like greetings and arithmetic \
             myself and hand harder questions to one of several language-model providers, \
             switching to the next one if a provider is unavailable.",
            self.name
        )
    }

    pub fn empty_input(&self) -> String {
        "It looks like your message was empty. Please say something and I'll do my best to help!"
            .to_string()
    }

    /// Static apology returned when every provider failed.
    pub fn fallback(&self) -> String {
        "I'm sorry, I'm having trouble reaching my AI services right now. \
         Please try again in a moment."
            .to_string()
    }

    pub fn help(&self) -> String {
        format!(
            "**{} can help with:**\n\
             - 🧮 **Math**: `2+3`, `15*8-10`, `(5+3)*2`, `2^10`\n\
             - 🔢 **Prime numbers**: `primes between 10 and 50`\n\
             - 📝 **Writing**: essays, summaries, explanations\n\
             - 💻 **Code**: programming questions and examples\n\
             - 💬 **Conversation**: anything else on your mind\n\n\
             **Commands:**\n\
             - `/help` - show this menu\n\
             - `/status` - show which AI providers are configured",
            self.name
        )
    }

    pub fn status(&self, providers: &[String]) -> String {
        if providers.is_empty() {
            return "**Status:** no AI providers are configured. \
                    Built-in greetings, math and commands still work."
                .to_string();
        }

        let order = providers
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{}. {}", i + 1, name))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "**Status:** {} provider(s) configured, tried in this order:\n{}",
            providers.len(),
            order
        )
    }

    pub fn unknown_command(&self, command: &str) -> String {
        format!("Unknown command `{}`. Type /help to see available commands.", command)
    }
}
