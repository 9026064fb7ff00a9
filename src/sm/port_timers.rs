//! Port Timers (spec §4.10): decrements every countdown exactly once per
//! second, driven solely by [`crate::Bridge::on_one_second_tick`]. Unlike
//! the other nine machines this one has no named states of its own — spec
//! §4.10 describes it as a single periodic action, so there's no `State`
//! enum or `check_conditions`/`init_state` pair here, just the tick.

use crate::{model::Bridge, Callbacks};

/// Decrements every per-port and per-port-per-tree countdown by one second,
/// ages received information whose `messageAge` has reached `maxAge`, and
/// resets `txCount` once per `helloTime` window (802.1Q §13.25.14).
pub fn tick<C: Callbacks>(bridge: &mut Bridge<C>) {
    for port in 0..bridge.port_count() {
        let hello_expired = {
            let p = bridge.port_mut(port);
            p.m_delay_while.tick();
            p.edge_delay_while.tick();
            p.hello_when.tick()
        };
        if hello_expired {
            bridge.port_mut(port).tx_count = 0;
        }

        for tree in 0..bridge.tree_count() {
            let pt = bridge.port_mut(port).tree_mut(tree);
            pt.fd_while.tick();
            pt.rr_while.tick();
            pt.rb_while.tick();
            pt.tc_while.tick();

            if pt.msg_times.message_age < pt.msg_times.max_age {
                pt.msg_times.message_age = pt.msg_times.message_age.saturating_add(1);
            } else if pt.info_is == crate::model::InfoIs::Received {
                pt.info_is = crate::model::InfoIs::Aged;
                pt.reselect = true;
            }
        }
    }
}
