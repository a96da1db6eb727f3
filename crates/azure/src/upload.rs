//! Block blob upload
//!
//! Small files are written with a single Put Blob request. Larger files are
//! read sequentially in fixed-size blocks; up to `concurrency` Put Block
//! requests run at once, and the blocks are committed in file order with one
//! Put Block List.

use std::path::Path;

use azure_storage_blobs::blob::{BlobBlockType, BlockList};
use azure_storage_blobs::prelude::{BlobClient, BlockId};
use futures::{TryStreamExt, stream};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use blobup_core::transfer::{block_count, block_range};
use blobup_core::{Error, Result, TransferOptions};

use crate::client::storage_error;

/// Upload `source` to `blob`, returning the number of bytes sent
///
/// The file handle is dropped before this returns, whatever the outcome.
pub(crate) async fn upload_file(
    blob: &BlobClient,
    source: &Path,
    options: &TransferOptions,
) -> Result<u64> {
    let mut file = File::open(source).await?;
    let size = file.metadata().await?.len();
    let content_type = content_type_for(source);

    if options.uses_single_request(size) {
        let mut data = Vec::with_capacity(size as usize);
        file.read_to_end(&mut data).await?;
        drop(file);

        let mut request = blob.put_block_blob(data);
        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }
        request.await.map_err(storage_error)?;
        return Ok(size);
    }

    let block_size = options.block_size_for(size);
    tracing::debug!(
        blob = blob.blob_name(),
        size,
        block_size,
        blocks = block_count(size, block_size),
        concurrency = options.concurrency,
        "uploading in blocks"
    );

    let blocks = read_blocks(file, block_size)
        .map_ok(|(index, chunk)| {
            let blob = blob.clone();
            async move {
                let (start, end) = block_range(index, block_size, size);
                tracing::trace!(index, start, end, "put block");
                let block_id = BlockId::new(uuid::Uuid::new_v4().as_bytes().to_vec());
                blob.put_block(block_id.clone(), chunk)
                    .await
                    .map_err(storage_error)?;
                Ok::<_, Error>((index, block_id))
            }
        })
        .try_buffer_unordered(options.concurrency);

    let mut committed: Vec<(u64, BlockId)> = blocks.try_collect().await?;
    committed.sort_by_key(|(index, _)| *index);

    let block_list = BlockList {
        blocks: committed
            .into_iter()
            .map(|(_, id)| BlobBlockType::Uncommitted(id))
            .collect(),
    };

    let mut request = blob.put_block_list(block_list);
    if let Some(ct) = content_type {
        request = request.content_type(ct);
    }
    request.await.map_err(storage_error)?;

    Ok(size)
}

/// Stream of `(index, bytes)` blocks read from the start of `file`
///
/// Every block except the last is exactly `block_size` bytes long.
fn read_blocks(
    file: File,
    block_size: u64,
) -> impl futures::Stream<Item = Result<(u64, Vec<u8>)>> {
    stream::try_unfold((file, 0u64), move |(mut file, index)| async move {
        let mut chunk = Vec::with_capacity(block_size as usize);
        (&mut file).take(block_size).read_to_end(&mut chunk).await?;
        if chunk.is_empty() {
            return Ok(None);
        }
        Ok::<_, Error>(Some(((index, chunk), (file, index + 1))))
    })
}

/// Content type guessed from the file extension
fn content_type_for(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
}
