use super::*;
use crate::types::ChallengeSource;

/// A challenge ready to show. Never an error: failures become backup tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct Challenge {
    pub text: String,
    pub source: ChallengeSource,
}

/// Supplies challenge text for a turn.
///
/// `generate` surfaces upstream errors (the relay endpoint needs them);
/// `request_challenge` swallows them and falls back to the backup list so
/// players always get a task.
pub struct ChallengeProvider {
    manager: Option<LlmManager>,
    offline: bool,
    timeout: Duration,
    max_tokens: u32,
    dev_delay: Duration,
}

impl ChallengeProvider {
    pub fn new(manager: Option<LlmManager>, config: &ChallengeConfig) -> Self {
        Self {
            manager,
            offline: config.offline,
            timeout: config.timeout,
            max_tokens: config.max_tokens,
            dev_delay: Duration::from_millis(500),
        }
    }

    /// Provider that never touches the network
    pub fn offline() -> Self {
        Self::new(
            None,
            &ChallengeConfig {
                offline: true,
                ..Default::default()
            },
        )
    }

    /// Override the simulated latency of offline mode
    pub fn with_dev_delay(mut self, delay: Duration) -> Self {
        self.dev_delay = delay;
        self
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn has_providers(&self) -> bool {
        self.manager
            .as_ref()
            .is_some_and(|manager| !manager.providers.is_empty())
    }

    /// Ask the configured providers for a challenge
    pub async fn generate(
        &self,
        difficulty: &str,
        player_names: &[String],
        current_player_name: &str,
    ) -> ProviderResult<String> {
        let manager = self.manager.as_ref().ok_or(ProviderError::NotConfigured)?;

        let request = GenerateRequest {
            prompt: build_prompt(difficulty, player_names, current_player_name),
            max_tokens: Some(self.max_tokens),
            timeout: self.timeout,
        };

        let (_, response) = manager.generate_first(request).await?;
        Ok(response.text)
    }

    /// Challenge for the given player, falling back to a backup task on any failure
    pub async fn request_challenge(
        &self,
        difficulty: &str,
        player_names: &[String],
        current_player_name: &str,
    ) -> Challenge {
        if self.offline {
            tracing::debug!("Offline mode: skipping challenge providers");
            tokio::time::sleep(self.dev_delay).await;
            return Challenge {
                text: dev_task(),
                source: ChallengeSource::Dev,
            };
        }

        match self
            .generate(difficulty, player_names, current_player_name)
            .await
        {
            Ok(text) => Challenge {
                text,
                source: ChallengeSource::Live,
            },
            Err(e) => {
                tracing::warn!(
                    "Challenge generation for {} failed: {}, using backup task",
                    current_player_name,
                    e
                );
                Challenge {
                    text: backup_task(),
                    source: ChallengeSource::Backup,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::tests::StubProvider;

    fn names() -> Vec<String> {
        vec!["Alice".to_string(), "Bob".to_string()]
    }

    fn provider_with(providers: Vec<Box<dyn LlmProvider>>) -> ChallengeProvider {
        ChallengeProvider::new(Some(LlmManager::new(providers)), &ChallengeConfig::default())
    }

    #[tokio::test]
    async fn test_live_challenge() {
        let provider = provider_with(vec![Box::new(StubProvider::ok("stub", "Do a cartwheel."))]);
        let challenge = provider.request_challenge("fun", &names(), "Alice").await;

        assert_eq!(challenge.text, "Do a cartwheel.");
        assert_eq!(challenge.source, ChallengeSource::Live);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_backup() {
        let provider = provider_with(vec![Box::new(StubProvider::failing("stub"))]);
        let challenge = provider.request_challenge("fun", &names(), "Alice").await;

        assert!(is_backup(&challenge.text));
        assert_eq!(challenge.source, ChallengeSource::Backup);
    }

    #[tokio::test]
    async fn test_unconfigured_provider() {
        let provider = ChallengeProvider::new(None, &ChallengeConfig::default());
        assert!(!provider.has_providers());

        let result = provider.generate("fun", &names(), "Alice").await;
        assert!(matches!(result, Err(ProviderError::NotConfigured)));

        let challenge = provider.request_challenge("fun", &names(), "Alice").await;
        assert_eq!(challenge.source, ChallengeSource::Backup);
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_mode_skips_providers() {
        let stub = StubProvider::ok("stub", "Never used.");
        let calls = stub.calls.clone();
        let provider = ChallengeProvider::new(
            Some(LlmManager::new(vec![Box::new(stub)])),
            &ChallengeConfig {
                offline: true,
                ..Default::default()
            },
        );

        let challenge = provider.request_challenge("fun", &names(), "Alice").await;

        assert!(challenge.text.starts_with("[DEV] "));
        assert_eq!(challenge.source, ChallengeSource::Dev);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
