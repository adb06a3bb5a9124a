use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::mpsc::UnboundedReceiver;
use futures::Stream;

use chromate_cdp::cdp::events::{CdpEvent, TypedEvent};

/// The receiver half of an event subscription.
///
/// Dropping the stream unsubscribes; the sending side is pruned on the next
/// dispatch.
#[must_use = "streams do nothing unless polled"]
#[derive(Debug)]
pub struct EventStream<T: TypedEvent> {
    events: UnboundedReceiver<CdpEvent>,
    _marker: PhantomData<T>,
}

impl<T: TypedEvent> EventStream<T> {
    pub(crate) fn new(events: UnboundedReceiver<CdpEvent>) -> Self {
        Self {
            events,
            _marker: PhantomData,
        }
    }
}

impl<T: TypedEvent + Unpin> Stream for EventStream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let pin = self.get_mut();
        loop {
            match Stream::poll_next(Pin::new(&mut pin.events), cx) {
                Poll::Ready(Some(event)) => match T::try_from(event) {
                    Ok(event) => return Poll::Ready(Some(event)),
                    // subscriptions are per method, a mismatch here is a bug
                    Err(other) => {
                        tracing::error!(
                            "subscription for {} received a foreign event: {other:?}",
                            T::METHOD
                        );
                    }
                },
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
