#[cfg(test)]
mod tests {
    use recall_core::*;

    // ── Experience tests ───────────────────────────────────────

    #[test]
    fn test_from_text_defaults() {
        let exp = Experience::from_text("hello there");
        assert_eq!(exp.content, "hello there");
        assert_eq!(exp.modality, "text");
        assert_eq!(exp.saliency, 0.5);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Experience::from_text("a");
        let b = Experience::from_text("a");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_summary_rounds_saliency() {
        let mut exp = Experience::from_text("x");
        exp.saliency = 0.123456;
        let summary = exp.summary();
        assert_eq!(summary.saliency, 0.123);
        assert_eq!(summary.id, exp.id);
        assert_eq!(summary.content, "x");
    }

    #[test]
    fn test_experience_serde_roundtrip() {
        let exp = Experience::from_text("roundtrip");
        let json = serde_json::to_string(&exp).unwrap();
        let restored: Experience = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, exp.id);
        assert_eq!(restored.timestamp, exp.timestamp);
        assert_eq!(restored.content, exp.content);
    }

    #[test]
    fn test_thought_serde_roundtrip() {
        let thought = Thought::new("slow", "deduced from arithmetic", "4");
        let json = serde_json::to_string(&thought).unwrap();
        let restored: Thought = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, thought);
    }

    // ── Error tests ────────────────────────────────────────────

    #[test]
    fn test_error_display() {
        let err = RecallError::EmbeddingUnavailable("backend down".into());
        assert!(err.to_string().contains("backend down"));

        let err = RecallError::IndexInconsistency {
            episodes: 3,
            embeddings: 2,
        };
        assert!(err.to_string().contains("3 episodes"));
        assert!(err.to_string().contains("2 embeddings"));
    }

    #[test]
    fn test_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: RecallError = io.into();
        assert!(matches!(err, RecallError::Io(_)));
    }

    // ── Config tests ───────────────────────────────────────────

    #[test]
    fn test_config_defaults() {
        let config = MemoryConfig::default();
        assert_eq!(config.working.capacity, 8);
        assert_eq!(config.working.reinforce_delta, 0.1);
        assert!(config.long_term.storage_dir.is_none());
        assert_eq!(config.long_term.index, "flat");
        assert_eq!(config.embedder.provider, "hash");
        assert_eq!(config.embedder.dimensions, 384);
    }

    #[test]
    fn test_partial_toml_applies_defaults() {
        let raw = r#"
[working]
capacity = 3

[long_term]
storage_dir = "/tmp/recall-store"
"#;
        let config = MemoryConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.working.capacity, 3);
        assert_eq!(config.working.reinforce_delta, 0.1);
        assert_eq!(
            config.long_term.storage_dir.as_deref(),
            Some(std::path::Path::new("/tmp/recall-store"))
        );
        assert_eq!(config.embedder.provider, "hash");
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = MemoryConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let restored = MemoryConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(restored.working.capacity, config.working.capacity);
        assert_eq!(restored.long_term.index, config.long_term.index);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = MemoryConfig::default();
        config.working.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_index() {
        let mut config = MemoryConfig::default();
        config.long_term.index = "hnsw".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_provider() {
        let mut config = MemoryConfig::default();
        config.embedder.provider = "word2vec".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recall.toml");
        let config = MemoryConfig::load(Some(&path)).unwrap();
        assert_eq!(config.working.capacity, 8);
    }

    #[test]
    fn test_load_parses_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recall.toml");
        std::fs::write(&path, "[working]\ncapacity = 5\n").unwrap();
        let config = MemoryConfig::load(Some(&path)).unwrap();
        assert_eq!(config.working.capacity, 5);
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recall.toml");
        std::fs::write(&path, "[working\ncapacity = ").unwrap();
        assert!(MemoryConfig::load(Some(&path)).is_err());
    }
}
