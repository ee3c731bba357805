use std::sync::atomic::Ordering;
use std::sync::Arc;

use substrate_core::RequestContext;
use substrate_embed::{CachingEmbedder, Embedder, LocalProvider};

#[test]
fn dimension_is_stable_across_calls() {
    let provider = LocalProvider::new(32);
    let ctx = RequestContext::default();
    let texts = vec!["hello world".to_string(), "another text".to_string()];
    let vectors = provider.embed(&ctx, &texts).unwrap();
    assert_eq!(vectors.len(), 2);
    for vector in vectors {
        assert_eq!(vector.len(), 32);
    }
}

#[test]
fn same_text_embeds_identically() {
    let provider = LocalProvider::new(16);
    let ctx = RequestContext::default();
    let a = provider
        .embed(&ctx, &["repeat me".to_string()])
        .unwrap();
    let b = provider
        .embed(&ctx, &["repeat me".to_string()])
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn different_text_embeds_differently() {
    let provider = LocalProvider::new(16);
    let ctx = RequestContext::default();
    let a = provider.embed(&ctx, &["foo".to_string()]).unwrap();
    let b = provider.embed(&ctx, &["bar baz qux".to_string()]).unwrap();
    assert_ne!(a, b);
}

#[test]
fn embeddings_are_unit_normalized() {
    let provider = LocalProvider::new(8);
    let ctx = RequestContext::default();
    let vectors = provider.embed(&ctx, &["some text to embed".to_string()]).unwrap();
    let norm: f32 = vectors[0].iter().map(|v| v * v).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4, "norm was {norm}");
}

#[test]
fn empty_batch_is_rejected() {
    let provider = LocalProvider::new(8);
    let ctx = RequestContext::default();
    let result = provider.embed(&ctx, &[]);
    assert!(result.is_err());
}

#[test]
fn oversized_batch_is_rejected() {
    let provider = LocalProvider::new(4);
    let ctx = RequestContext::default();
    let texts: Vec<String> = (0..600).map(|i| format!("text {i}")).collect();
    let result = provider.embed(&ctx, &texts);
    assert!(result.is_err());
}

#[test]
fn cancellation_is_observed_mid_batch() {
    let provider = LocalProvider::new(4);
    let ctx = RequestContext::default();
    let handle = ctx.cancellation_handle();
    handle.store(true, Ordering::SeqCst);
    let texts = vec!["a".to_string(), "b".to_string()];
    let result = provider.embed(&ctx, &texts);
    assert!(result.is_err());
}

#[test]
fn caching_embedder_serves_repeat_text_from_cache() {
    let provider = LocalProvider::new(8);
    let caching = CachingEmbedder::new(provider, 100);
    let ctx = RequestContext::default();

    let first = caching
        .embed(&ctx, &["cache me please".to_string()])
        .unwrap();
    assert_eq!(caching.len(), 1);

    let second = caching
        .embed(&ctx, &["cache me please".to_string()])
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(caching.len(), 1);
}

#[test]
fn caching_embedder_handles_mixed_hit_and_miss_batch() {
    let provider = LocalProvider::new(8);
    let caching = CachingEmbedder::new(provider, 100);
    let ctx = RequestContext::default();

    caching.embed(&ctx, &["already seen".to_string()]).unwrap();
    let batch = vec!["already seen".to_string(), "brand new".to_string()];
    let result = caching.embed(&ctx, &batch).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(caching.len(), 2);

    let direct = LocalProvider::new(8);
    let direct_vectors = direct.embed(&ctx, &batch).unwrap();
    assert_eq!(result, direct_vectors);
}

#[test]
fn caching_embedder_exposes_inner_name_and_dimension() {
    let provider = LocalProvider::new(12);
    let caching = CachingEmbedder::new(provider, 10);
    assert_eq!(caching.dimension(), 12);
    assert_eq!(caching.name(), "local-hash-projection");
}

#[test]
fn close_invalidates_cache() {
    let provider = LocalProvider::new(8);
    let caching = CachingEmbedder::new(provider, 100);
    let ctx = RequestContext::default();
    caching.embed(&ctx, &["value".to_string()]).unwrap();
    assert!(!caching.is_empty());
    caching.close().unwrap();
    assert!(caching.is_empty());
}

#[test]
fn embedder_trait_object_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Arc<dyn Embedder>>();
}
