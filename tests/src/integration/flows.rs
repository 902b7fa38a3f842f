//! # Integration Test Flows
//!
//! Tests that the block operations service, the standard crypto engine and
//! the in-memory key manager and block server work together.
//!
//! ## Flows Tested:
//!
//! 1. **Write → read → release**: ready, put, get, delete over real crypto
//! 2. **Deduplication**: extra references share one stored ciphertext
//! 3. **Key rotation**: old blocks stay readable at their recorded generation
//! 4. **Public folders**: the well-known key, no key manager entries
//! 5. **Cancellation**: collaborators report a cancelled context

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tracing::Instrument;

    use block_ops::{
        BlockOps, BlockOpsConfig, BlockOpsError, BlockServerError, ConfigError, InMemoryBlockOps,
        KeyError, MAX_PLAINTEXT_BLOCK_SIZE,
    };
    use shared_crypto::{Cipher, CryptoError};
    use shared_types::{
        BlockId, BlockPointer, KeyGen, OpContext, RootMetadata, TlfId, UserId, PUBLIC_KEY_GEN,
    };

    use crate::fixtures::{at_generation, private_folder, private_folder_with, DirBlock, FileBlock};

    // =============================================================================
    // WRITE → READ → RELEASE
    // =============================================================================

    #[tokio::test]
    async fn test_ready_put_get_delete_roundtrip() {
        let (ops, md) = private_folder(1);
        let ctx = OpContext::background();
        let block = FileBlock::random(3000);

        let (id, plain_size, ready) = ops.ready(&ctx, &md, &block).await.unwrap();
        assert!(ready.encoded_size() >= plain_size);

        let ptr = BlockPointer::new(id, md.latest_key_generation(), UserId::default());
        ops.put(&ctx, &md, &ptr, &ready).await.unwrap();
        assert_eq!(ops.server().ref_count(&id), 1);

        let fetched: FileBlock = ops.get(&ctx, &md, &ptr).await.unwrap();
        assert_eq!(fetched, block);

        ops.delete(&ctx, &md, id, &ptr).await.unwrap();
        assert!(!ops.server().contains(&id));

        let err = ops.get::<FileBlock>(&ctx, &md, &ptr).await.unwrap_err();
        assert_eq!(err, BlockOpsError::Server(BlockServerError::NonExistent { id }));
    }

    #[tokio::test]
    async fn test_different_block_types_share_one_service() {
        let (ops, md) = private_folder(2);
        let ctx = OpContext::background();

        let file = FileBlock::random(100);
        let (file_id, _, ready) = ops.ready(&ctx, &md, &file).await.unwrap();
        let file_ptr = BlockPointer::new(file_id, md.latest_key_generation(), UserId::default());
        ops.put(&ctx, &md, &file_ptr, &ready).await.unwrap();

        let dir = DirBlock {
            children: vec![("notes.txt".to_string(), file_id.to_string())],
        };
        let (dir_id, _, ready) = ops.ready(&ctx, &md, &dir).await.unwrap();
        let dir_ptr = BlockPointer::new(dir_id, md.latest_key_generation(), UserId::default());
        ops.put(&ctx, &md, &dir_ptr, &ready).await.unwrap();

        let fetched: DirBlock = ops.get(&ctx, &md, &dir_ptr).await.unwrap();
        let child: BlockId = fetched.children[0].1.parse().unwrap();
        assert_eq!(child, file_id);

        let child_ptr = BlockPointer::new(child, md.latest_key_generation(), UserId::default());
        let fetched: FileBlock = ops.get(&ctx, &md, &child_ptr).await.unwrap();
        assert_eq!(fetched, file);
    }

    #[tokio::test]
    async fn test_ready_is_not_deterministic_across_calls() {
        let (ops, md) = private_folder(3);
        let ctx = OpContext::background();
        let block = FileBlock::random(64);

        // Fresh server half and nonce per call.
        let (a, _, _) = ops.ready(&ctx, &md, &block).await.unwrap();
        let (b, _, _) = ops.ready(&ctx, &md, &block).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_resending_identical_bytes_is_allowed() {
        let (ops, md) = private_folder(4);
        let ctx = OpContext::background();

        let (id, _, ready) = ops.ready(&ctx, &md, &FileBlock::random(10)).await.unwrap();
        let ptr = BlockPointer::new(id, md.latest_key_generation(), UserId::default());
        ops.put(&ctx, &md, &ptr, &ready).await.unwrap();
        ops.put(&ctx, &md, &ptr, &ready).await.unwrap();

        assert_eq!(ops.server().len(), 1);
        assert_eq!(ops.server().ref_count(&id), 1);
    }

    #[tokio::test]
    async fn test_aes_gcm_configuration_roundtrip() {
        let config = BlockOpsConfig::default().with_cipher(Cipher::Aes256Gcm);
        let (ops, md) = private_folder_with(5, config);
        let ctx = OpContext::background();
        let block = FileBlock::random(500);

        let (id, _, ready) = ops.ready(&ctx, &md, &block).await.unwrap();
        let ptr = BlockPointer::new(id, md.latest_key_generation(), UserId::default());
        ops.put(&ctx, &md, &ptr, &ready).await.unwrap();

        let fetched: FileBlock = ops.get(&ctx, &md, &ptr).await.unwrap();
        assert_eq!(fetched, block);
    }

    #[tokio::test]
    async fn test_oversized_block_rejected_before_upload() {
        let config = BlockOpsConfig::for_testing();
        let max = config.max_encoded_block_size;
        let (ops, md) = private_folder_with(6, config);

        let err = ops
            .ready(&OpContext::background(), &md, &FileBlock::random(max))
            .await
            .unwrap_err();
        assert!(matches!(err, BlockOpsError::BlockTooLarge { max_size, .. } if max_size == max));
        assert!(ops.server().is_empty());
    }

    #[tokio::test]
    async fn test_full_size_plaintext_fits_default_limit() {
        let (ops, md) = private_folder(7);
        let ctx = OpContext::background();
        // bincode adds an 8-byte length, so this serializes to exactly 512 KiB.
        let block = FileBlock {
            contents: vec![7; MAX_PLAINTEXT_BLOCK_SIZE - 8],
        };

        let (id, plain_size, ready) = ops.ready(&ctx, &md, &block).await.unwrap();
        assert_eq!(plain_size, MAX_PLAINTEXT_BLOCK_SIZE);
        assert!(ready.encoded_size() <= ops.config().max_encoded_block_size);

        let ptr = BlockPointer::new(id, md.latest_key_generation(), UserId::default());
        ops.put(&ctx, &md, &ptr, &ready).await.unwrap();
        let fetched: FileBlock = ops.get(&ctx, &md, &ptr).await.unwrap();
        assert_eq!(fetched, block);
    }

    #[tokio::test]
    async fn test_default_limit_boundary_is_the_size_class() {
        let (ops, md) = private_folder(8);
        let ctx = OpContext::background();
        let class = 2 * MAX_PLAINTEXT_BLOCK_SIZE;

        // Serialized length plus the 4-byte padding prefix fills the class.
        let largest = FileBlock {
            contents: vec![1; class - 4 - 8],
        };
        assert!(ops.ready(&ctx, &md, &largest).await.is_ok());

        let spilled = FileBlock {
            contents: vec![1; class - 3 - 8],
        };
        let err = ops.ready(&ctx, &md, &spilled).await.unwrap_err();
        assert!(matches!(err, BlockOpsError::BlockTooLarge { .. }));
        assert!(ops.server().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let odd_floor = BlockOpsConfig::default().with_min_padded_size(300);
        assert!(matches!(
            InMemoryBlockOps::new_in_memory(odd_floor),
            Err(ConfigError::InvalidPaddedSize(300))
        ));

        let tiny_max = BlockOpsConfig::default().with_max_encoded_block_size(128);
        assert!(matches!(
            InMemoryBlockOps::new_in_memory(tiny_max),
            Err(ConfigError::MaxBelowMin { max: 128, min: 256 })
        ));
    }

    // =============================================================================
    // DEDUPLICATION
    // =============================================================================

    #[tokio::test]
    async fn test_extra_reference_shares_stored_block() {
        let (ops, md) = private_folder(10);
        let ctx = OpContext::background();
        let block = FileBlock::random(1000);

        let (id, _, ready) = ops.ready(&ctx, &md, &block).await.unwrap();
        let original = BlockPointer::new(id, md.latest_key_generation(), UserId::default());
        ops.put(&ctx, &md, &original, &ready).await.unwrap();

        let copy = original.with_new_ref();
        assert!(!copy.is_first_ref());
        ops.put(&ctx, &md, &copy, &ready).await.unwrap();
        assert_eq!(ops.server().len(), 1);
        assert_eq!(ops.server().ref_count(&id), 2);

        // Releasing the original keeps the bytes alive for the copy.
        ops.delete(&ctx, &md, id, &original).await.unwrap();
        let fetched: FileBlock = ops.get(&ctx, &md, &copy).await.unwrap();
        assert_eq!(fetched, block);

        ops.delete(&ctx, &md, id, &copy).await.unwrap();
        assert!(ops.server().is_empty());
    }

    #[tokio::test]
    async fn test_extra_reference_to_missing_block_fails() {
        let (ops, md) = private_folder(11);
        let ctx = OpContext::background();

        let (id, _, ready) = ops.ready(&ctx, &md, &FileBlock::random(10)).await.unwrap();
        let copy = BlockPointer::new(id, md.latest_key_generation(), UserId::default()).with_new_ref();

        let err = ops.put(&ctx, &md, &copy, &ready).await.unwrap_err();
        assert_eq!(err, BlockOpsError::Server(BlockServerError::NonExistent { id }));
    }

    #[tokio::test]
    async fn test_blocks_are_folder_scoped() {
        let (ops, md) = private_folder(12);
        let ctx = OpContext::background();

        let (id, _, ready) = ops.ready(&ctx, &md, &FileBlock::random(10)).await.unwrap();
        let ptr = BlockPointer::new(id, md.latest_key_generation(), UserId::default());
        ops.put(&ctx, &md, &ptr, &ready).await.unwrap();

        let other = RootMetadata::new(TlfId::fake(13, false), KeyGen(1));
        let err = ops.get::<FileBlock>(&ctx, &other, &ptr).await.unwrap_err();
        assert_eq!(
            err,
            BlockOpsError::Server(BlockServerError::WrongFolder {
                id,
                owner: md.id,
                requested: other.id
            })
        );
    }

    // =============================================================================
    // KEY ROTATION
    // =============================================================================

    #[tokio::test]
    async fn test_old_blocks_readable_after_rotation() {
        let (ops, md) = private_folder(20);
        let ctx = OpContext::background();
        let old_block = FileBlock::random(200);

        let (old_id, _, ready) = ops.ready(&ctx, &md, &old_block).await.unwrap();
        let old_ptr = BlockPointer::new(old_id, md.latest_key_generation(), UserId::default());
        ops.put(&ctx, &md, &old_ptr, &ready).await.unwrap();

        let rotated_gen = ops.keys().add_random_key(md.id);
        assert_eq!(rotated_gen, KeyGen(2));
        let rotated = at_generation(&md, rotated_gen);

        let fetched: FileBlock = ops.get(&ctx, &rotated, &old_ptr).await.unwrap();
        assert_eq!(fetched, old_block);

        let new_block = FileBlock::random(200);
        let (new_id, _, ready) = ops.ready(&ctx, &rotated, &new_block).await.unwrap();
        let new_ptr = BlockPointer::new(new_id, rotated_gen, UserId::default());
        ops.put(&ctx, &rotated, &new_ptr, &ready).await.unwrap();
        let fetched: FileBlock = ops.get(&ctx, &rotated, &new_ptr).await.unwrap();
        assert_eq!(fetched, new_block);

        // Same bytes, wrong recorded generation: authentication fails.
        let mislabeled = BlockPointer::new(new_id, KeyGen(1), UserId::default());
        let err = ops.get::<FileBlock>(&ctx, &rotated, &mislabeled).await.unwrap_err();
        assert!(matches!(err, BlockOpsError::Crypto(CryptoError::DecryptionFailed(_))));
    }

    #[tokio::test]
    async fn test_generation_newer_than_metadata_rejected() {
        let (ops, md) = private_folder(21);
        let ctx = OpContext::background();
        ops.keys().add_random_key(md.id);

        let (id, _, ready) = ops.ready(&ctx, &md, &FileBlock::random(10)).await.unwrap();
        let ptr = BlockPointer::new(id, md.latest_key_generation(), UserId::default());
        ops.put(&ctx, &md, &ptr, &ready).await.unwrap();

        let ahead = BlockPointer::new(id, KeyGen(2), UserId::default());
        let err = ops.get::<FileBlock>(&ctx, &md, &ahead).await.unwrap_err();
        assert_eq!(
            err,
            BlockOpsError::Key(KeyError::InvalidKeyGeneration {
                tlf: md.id,
                key_gen: KeyGen(2),
                latest: KeyGen(1)
            })
        );
    }

    // =============================================================================
    // PUBLIC FOLDERS
    // =============================================================================

    #[tokio::test]
    async fn test_public_folder_roundtrip() {
        let ops = InMemoryBlockOps::new_in_memory(BlockOpsConfig::default()).unwrap();
        let md = RootMetadata::new(TlfId::fake(30, true), KeyGen(1));
        assert_eq!(md.latest_key_generation(), PUBLIC_KEY_GEN);
        let ctx = OpContext::background();
        let block = FileBlock::random(42);

        let (id, _, ready) = ops.ready(&ctx, &md, &block).await.unwrap();
        let ptr = BlockPointer::new(id, PUBLIC_KEY_GEN, UserId::default());
        ops.put(&ctx, &md, &ptr, &ready).await.unwrap();

        let fetched: FileBlock = ops.get(&ctx, &md, &ptr).await.unwrap();
        assert_eq!(fetched, block);
    }

    // =============================================================================
    // CANCELLATION
    // =============================================================================

    #[tokio::test]
    async fn test_cancelled_context_reported_by_collaborators() {
        let (ops, md) = private_folder(40);
        let ctx = OpContext::background();
        let (id, _, ready) = ops.ready(&ctx, &md, &FileBlock::random(10)).await.unwrap();
        let ptr = BlockPointer::new(id, md.latest_key_generation(), UserId::default());

        let cancelled = ctx.child(None);
        ctx.cancel();

        let err = ops
            .ready(&cancelled, &md, &FileBlock::random(10))
            .await
            .unwrap_err();
        assert_eq!(err, BlockOpsError::Key(KeyError::Cancelled));

        let err = ops.put(&cancelled, &md, &ptr, &ready).await.unwrap_err();
        assert_eq!(err, BlockOpsError::Server(BlockServerError::Cancelled));
        assert!(!err.is_retriable());
        assert!(ops.server().is_empty());
    }

    #[tokio::test]
    async fn test_expired_deadline_reported() {
        let (ops, md) = private_folder(41);
        let ctx = OpContext::with_timeout(Duration::from_millis(1));
        tokio::time::sleep(Duration::from_millis(5)).await;

        let ptr = BlockPointer::new(BlockId::fake(1), md.latest_key_generation(), UserId::default());
        let err = ops.delete(&ctx, &md, ptr.id, &ptr).await.unwrap_err();
        assert_eq!(err, BlockOpsError::Server(BlockServerError::DeadlineExceeded));
        assert!(err.is_retriable());
    }

    // =============================================================================
    // CONCURRENCY
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writers_and_readers() {
        let (ops, md) = private_folder(50);
        let ops = Arc::new(ops);

        let mut handles = Vec::new();
        for i in 0..16usize {
            let ops = ops.clone();
            let md = md.clone();
            handles.push(tokio::spawn(async move {
                let ctx = OpContext::background();
                let block = FileBlock::random(100 + i);
                let (id, _, ready) = ops.ready(&ctx, &md, &block).await?;
                let ptr = BlockPointer::new(id, md.latest_key_generation(), UserId::default());
                ops.put(&ctx, &md, &ptr, &ready).await?;
                let fetched: FileBlock = ops.get(&ctx, &md, &ptr).await?;
                Ok::<_, BlockOpsError>(fetched == block)
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().unwrap());
        }
        assert_eq!(ops.server().len(), 16);
    }

    // =============================================================================
    // LOGGING
    // =============================================================================

    #[tokio::test]
    async fn test_operations_run_under_installed_subscriber() {
        let config = block_telemetry::TelemetryConfig {
            log_level: "block_ops=debug".to_string(),
            console_output: false,
            ..block_telemetry::TelemetryConfig::default()
        };
        // Another test binary thread may have installed it first.
        let _ = block_telemetry::init_logging(&config);

        let (ops, md) = private_folder(60);
        let ctx = OpContext::background();
        let block = FileBlock::random(10);

        let span = block_telemetry::block_span!("roundtrip", tlf_id = %md.id);
        let fetched: FileBlock = async {
            let (id, _, ready) = ops.ready(&ctx, &md, &block).await.unwrap();
            let ptr = BlockPointer::new(id, md.latest_key_generation(), UserId::default());
            ops.put(&ctx, &md, &ptr, &ready).await.unwrap();
            block_telemetry::log_block_event!(info, "stored", id, md.id);
            ops.get(&ctx, &md, &ptr).await.unwrap()
        }
        .instrument(span)
        .await;
        assert_eq!(fetched, block);
    }
}
