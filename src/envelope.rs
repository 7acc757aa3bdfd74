// SPDX-License-Identifier: Apache-2.0 OR MIT
// Queue element handed from producer threads to pool workers.
//
// A Log envelope owns a deep copy of the record (name and payload live in
// the envelope's own Strings, so moving the envelope never invalidates
// them) and a strong handle to its async logger, which keeps the logger
// alive until the worker has finished with the record.

use crate::async_logger::AsyncLogger;
use crate::record::OwnedRecord;
use std::sync::Arc;

pub(crate) enum Envelope {
    Log {
        owner: Arc<AsyncLogger>,
        record: OwnedRecord,
    },
    Flush {
        owner: Arc<AsyncLogger>,
    },
    Terminate,
}
