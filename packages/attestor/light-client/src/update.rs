//! Attestor light client update logic

use ibc_client_host_types::{ConsensusState, Height};

use crate::header::Header;

/// Updates the consensus state with a new header
/// Returns (`new_height`, `new_consensus_state`, `optional_new_latest_height`)
#[must_use]
pub fn update_consensus_state(
    current_latest_height: Height,
    header: &Header,
) -> (Height, ConsensusState, Option<Height>) {
    let new_consensus_state = header.consensus_state();

    // Advance the latest height only if the header is beyond it
    let height_has_progressed = header.height > current_latest_height;
    let new_latest_height = height_has_progressed.then_some(header.height);

    (header.height, new_consensus_state, new_latest_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{signed_header, signing_keys, NOW};

    #[test]
    fn advances_latest_height_only_forward() {
        let header = signed_header(Height::new(0, 5), NOW, &[1; 32], &signing_keys()[..1]);

        let (height, cs, latest) = update_consensus_state(Height::new(0, 4), &header);
        assert_eq!(height, Height::new(0, 5));
        assert_eq!(cs, ConsensusState::new(NOW, vec![1; 32]));
        assert_eq!(latest, Some(Height::new(0, 5)));

        let (_, _, latest) = update_consensus_state(Height::new(0, 9), &header);
        assert_eq!(latest, None);
    }
}
