//! Continuation-token pagination over metastore listings.

use std::future::Future;

use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

use crate::client::Page;

enum PageState {
    Start,
    Next(String),
    Done,
}

/// Lazily walks every page returned by `fetch`.
///
/// The first call gets no token. Fetching stops once a page comes back with
/// no continuation token or an empty one. Items are yielded in page order.
pub fn paginate<'a, T, E, F, Fut>(fetch: F) -> BoxStream<'a, Result<T, E>>
where
    T: Send + 'a,
    E: Send + 'a,
    F: FnMut(Option<String>) -> Fut + Send + 'a,
    Fut: Future<Output = Result<Page<T>, E>> + Send + 'a,
{
    stream::try_unfold(
        (fetch, PageState::Start),
        |(mut fetch, state)| async move {
            let token = match state {
                PageState::Done => return Ok(None),
                PageState::Start => None,
                PageState::Next(token) => Some(token),
            };
            let page = fetch(token).await?;
            let next = match page.next_token {
                Some(token) if !token.is_empty() => PageState::Next(token),
                _ => PageState::Done,
            };
            let items = stream::iter(page.items.into_iter().map(Ok::<T, E>));
            Ok(Some((items, (fetch, next))))
        },
    )
    .try_flatten()
    .boxed()
}

/// Collects every page returned by `fetch`.
pub async fn drain<T, E, F, Fut>(fetch: F) -> Result<Vec<T>, E>
where
    T: Send,
    E: Send,
    F: FnMut(Option<String>) -> Fut + Send,
    Fut: Future<Output = Result<Page<T>, E>> + Send,
{
    paginate(fetch).try_collect().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pages(count: usize, per_page: usize) -> Vec<Page<usize>> {
        (0..count)
            .map(|page| {
                let items = (page * per_page..(page + 1) * per_page).collect();
                let next = (page + 1 < count).then(|| (page + 1).to_string());
                Page::new(items, next)
            })
            .collect()
    }

    async fn drain_pages(all: Vec<Page<usize>>) -> (Vec<usize>, usize) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let all = Arc::new(all);
        let items = drain(move |token: Option<String>| {
            let all = all.clone();
            counter.fetch_add(1, Ordering::SeqCst);
            async move {
                let index = token.map_or(0, |t| t.parse::<usize>().unwrap());
                Ok::<_, ()>(all.get(index).cloned().unwrap_or_else(|| Page::last(vec![])))
            }
        })
        .await
        .unwrap();
        (items, calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn test_drain_zero_one_and_many_pages() {
        let (items, calls) = drain_pages(vec![]).await;
        assert!(items.is_empty());
        assert_eq!(calls, 1);

        let (items, calls) = drain_pages(pages(1, 4)).await;
        assert_eq!(items, vec![0, 1, 2, 3]);
        assert_eq!(calls, 1);

        let (items, calls) = drain_pages(pages(3, 10)).await;
        assert_eq!(items, (0..30).collect::<Vec<_>>());
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_empty_token_ends_listing() {
        let items = drain(|token: Option<String>| async move {
            assert!(token.is_none());
            Ok::<_, ()>(Page::new(vec!["a"], Some(String::new())))
        })
        .await
        .unwrap();
        assert_eq!(items, vec!["a"]);
    }

    #[tokio::test]
    async fn test_error_stops_stream() {
        let mut stream = paginate(|token: Option<String>| async move {
            match token {
                None => Ok(Page::new(vec![1], Some("next".to_string()))),
                Some(_) => Err("boom"),
            }
        });
        assert_eq!(stream.next().await, Some(Ok(1)));
        assert_eq!(stream.next().await, Some(Err("boom")));
        assert_eq!(stream.next().await, None);
    }
}
