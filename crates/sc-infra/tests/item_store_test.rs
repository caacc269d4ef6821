use std::collections::HashSet;

use sc_core::ports::ItemStorePort;
use sc_core::{ClipError, ItemToken};
use sc_infra::FilesystemItemStore;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn put(store: &FilesystemItemStore, data: &[u8]) -> ItemToken {
    let (token, mut sink) = store.begin_write().await.unwrap();
    sink.write_all(data).await.unwrap();
    sink.shutdown().await.unwrap();
    token
}

async fn get(store: &FilesystemItemStore, token: &ItemToken) -> Vec<u8> {
    let mut source = store.open_read(token).await.unwrap();
    let mut data = Vec::new();
    source.read_to_end(&mut data).await.unwrap();
    data
}

#[tokio::test]
async fn test_put_and_get_item() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemItemStore::new(temp_dir.path());

    let token = put(&store, b"hello, world!").await;

    assert!(store.exists(&token).await.unwrap());
    assert_eq!(get(&store, &token).await, b"hello, world!");
}

#[tokio::test]
async fn test_open_read_missing_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemItemStore::new(temp_dir.path());

    let token = ItemToken::from("nonexistent");
    let result = store.open_read(&token).await;

    assert!(matches!(result, Err(ClipError::NotFound(t)) if t == token));
}

#[tokio::test]
async fn test_tokens_are_unique_across_writes() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemItemStore::new(temp_dir.path());

    let mut tokens = HashSet::new();
    for i in 0..32u8 {
        tokens.insert(put(&store, &[i]).await);
    }
    assert_eq!(tokens.len(), 32);
}

#[tokio::test]
async fn test_open_write_rejects_existing_item() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemItemStore::new(temp_dir.path());

    let token = put(&store, b"published payload").await;
    let result = store.open_write(&token).await;

    assert!(matches!(result, Err(ClipError::Malformed(_))));
    assert_eq!(get(&store, &token).await, b"published payload");
}

#[tokio::test]
async fn test_begin_write_fails_when_directory_cannot_be_created() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let store = FilesystemItemStore::new(blocker.join("items"));

    let result = store.begin_write().await;

    assert!(matches!(result, Err(ClipError::StoreUnavailable(_))));
}

#[tokio::test]
async fn test_sweep_reports_unreadable_directory() {
    let temp_dir = TempDir::new().unwrap();
    let not_a_dir = temp_dir.path().join("items");
    std::fs::write(&not_a_dir, b"regular file").unwrap();
    let store = FilesystemItemStore::new(not_a_dir);

    assert!(matches!(store.clear().await, Err(ClipError::StoreUnavailable(_))));
    assert!(matches!(
        store.delete_all_except(&HashSet::new()).await,
        Err(ClipError::StoreUnavailable(_))
    ));
}

#[tokio::test]
async fn test_empty_item() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemItemStore::new(temp_dir.path());

    let token = put(&store, b"").await;

    assert!(store.exists(&token).await.unwrap());
    assert!(get(&store, &token).await.is_empty());
}

#[tokio::test]
async fn test_large_item() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemItemStore::new(temp_dir.path());

    let data = vec![7u8; 1024 * 1024]; // 1MB
    let token = put(&store, &data).await;

    assert_eq!(get(&store, &token).await, data);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemItemStore::new(temp_dir.path());
    let token = put(&store, b"x").await;

    assert!(store.delete(&token).await.unwrap());
    assert!(!store.delete(&token).await.unwrap());
    assert!(!store.exists(&token).await.unwrap());
}

#[tokio::test]
async fn test_delete_all_except_keeps_exactly_the_kept_set() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemItemStore::new(temp_dir.path());

    let a = put(&store, b"a").await;
    let b = put(&store, b"b").await;
    let c = put(&store, b"c").await;

    let keep: HashSet<ItemToken> = [b.clone()].into_iter().collect();
    let removed = store.delete_all_except(&keep).await.unwrap();

    assert_eq!(removed, 2);
    assert!(!store.exists(&a).await.unwrap());
    assert!(store.exists(&b).await.unwrap());
    assert!(!store.exists(&c).await.unwrap());
}

#[tokio::test]
async fn test_delete_all_except_ignores_unknown_kept_tokens() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemItemStore::new(temp_dir.path());
    let a = put(&store, b"a").await;

    let keep: HashSet<ItemToken> = [a.clone(), ItemToken::new()].into_iter().collect();
    assert_eq!(store.delete_all_except(&keep).await.unwrap(), 0);
    assert!(store.exists(&a).await.unwrap());
}

#[tokio::test]
async fn test_clear_removes_files_and_directories() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemItemStore::new(temp_dir.path());
    put(&store, b"a").await;
    put(&store, b"b").await;
    let nested = temp_dir.path().join("stray-dir");
    std::fs::create_dir_all(nested.join("inner")).unwrap();
    std::fs::write(nested.join("inner").join("f"), b"x").unwrap();

    assert_eq!(store.clear().await.unwrap(), 3);
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_clear_on_empty_store_returns_zero() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemItemStore::new(temp_dir.path());

    assert_eq!(store.clear().await.unwrap(), 0);
    assert_eq!(store.clear().await.unwrap(), 0);
}

#[tokio::test]
async fn test_concurrent_writers_and_sweep() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemItemStore::new(temp_dir.path());
    let kept = put(&store, b"kept").await;
    let keep: HashSet<ItemToken> = [kept.clone()].into_iter().collect();

    let writers: Vec<_> = (0..8u8)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let (token, mut sink) = store.begin_write().await.unwrap();
                sink.write_all(&[i; 64]).await.unwrap();
                sink.shutdown().await.unwrap();
                token
            })
        })
        .collect();
    let sweeper = {
        let store = store.clone();
        let keep = keep.clone();
        tokio::spawn(async move { store.delete_all_except(&keep).await })
    };

    for writer in writers {
        writer.await.unwrap();
    }
    assert!(sweeper.await.unwrap().is_ok());
    // The advertised item always survives; unadvertised fresh writes may or may not.
    assert!(store.exists(&kept).await.unwrap());
}
